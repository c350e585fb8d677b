//! Symbol definitions and the static symbol catalog

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use rd_core::{RdError, RdResult};

/// Symbol role classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SymbolRole {
    /// Regular paying symbol
    #[default]
    Normal,
    /// Substitutes for normal symbols in a run
    Wild,
    /// Excluded from wild substitution; triggers features elsewhere
    Scatter,
    /// Excluded from wild substitution; triggers bonus game elsewhere
    Bonus,
}

/// A symbol definition. Immutable after catalog construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    /// Unique symbol identifier (e.g., "HP1", "WILD")
    pub id: String,
    /// RNG weight, strictly positive
    pub weight: f64,
    /// Payout multiplier by run length (3..=reel_count)
    pub paytable: BTreeMap<u8, f64>,
    /// Role flag
    pub role: SymbolRole,
}

impl Symbol {
    /// Create a regular symbol
    pub fn normal(id: impl Into<String>, weight: f64, pays: &[(u8, f64)]) -> Self {
        Self {
            id: id.into(),
            weight,
            paytable: pays.iter().copied().collect(),
            role: SymbolRole::Normal,
        }
    }

    /// Create a wild symbol
    pub fn wild(id: impl Into<String>, weight: f64, pays: &[(u8, f64)]) -> Self {
        Self {
            id: id.into(),
            weight,
            paytable: pays.iter().copied().collect(),
            role: SymbolRole::Wild,
        }
    }

    /// Create a scatter symbol (no line pays by default)
    pub fn scatter(id: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            weight,
            paytable: BTreeMap::new(),
            role: SymbolRole::Scatter,
        }
    }

    /// Create a bonus symbol (no line pays)
    pub fn bonus(id: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            weight,
            paytable: BTreeMap::new(),
            role: SymbolRole::Bonus,
        }
    }

    /// Payout multiplier for a run length, 0.0 if the length has no entry
    pub fn pay(&self, run_length: u8) -> f64 {
        self.paytable.get(&run_length).copied().unwrap_or(0.0)
    }

    /// Wild, scatter or bonus
    pub fn is_special(&self) -> bool {
        !matches!(self.role, SymbolRole::Normal)
    }
}

/// Static registry of symbols. Read-only after construction; catalog order
/// is the insertion order and stays stable for the session.
#[derive(Debug, Clone)]
pub struct SymbolCatalog {
    symbols: Vec<Symbol>,
    index: HashMap<String, usize>,
    total_weight: f64,
}

impl SymbolCatalog {
    /// Build a catalog, validating unique ids and positive finite weights.
    pub fn new(symbols: Vec<Symbol>) -> RdResult<Self> {
        if symbols.is_empty() {
            return Err(RdError::InvalidCatalog("catalog must not be empty".into()));
        }

        let mut index = HashMap::with_capacity(symbols.len());
        let mut total_weight = 0.0;

        for (i, symbol) in symbols.iter().enumerate() {
            if !(symbol.weight.is_finite() && symbol.weight > 0.0) {
                return Err(RdError::InvalidCatalog(format!(
                    "symbol '{}' has non-positive weight {}",
                    symbol.id, symbol.weight
                )));
            }
            if index.insert(symbol.id.clone(), i).is_some() {
                return Err(RdError::InvalidCatalog(format!(
                    "duplicate symbol id '{}'",
                    symbol.id
                )));
            }
            total_weight += symbol.weight;
        }

        Ok(Self {
            symbols,
            index,
            total_weight,
        })
    }

    /// Standard catalog for a 5-reel game.
    /// Industry-standard naming: HP = High Paying, LP = Low Paying.
    pub fn standard() -> Self {
        let symbols = vec![
            Symbol::normal("HP1", 3.0, &[(3, 20.0), (4, 100.0), (5, 500.0)]),
            Symbol::normal("HP2", 4.0, &[(3, 15.0), (4, 75.0), (5, 300.0)]),
            Symbol::normal("HP3", 5.0, &[(3, 10.0), (4, 50.0), (5, 200.0)]),
            Symbol::normal("HP4", 6.0, &[(3, 8.0), (4, 40.0), (5, 150.0)]),
            Symbol::normal("LP1", 8.0, &[(3, 5.0), (4, 25.0), (5, 100.0)]),
            Symbol::normal("LP2", 9.0, &[(3, 4.0), (4, 20.0), (5, 80.0)]),
            Symbol::normal("LP3", 10.0, &[(3, 3.0), (4, 15.0), (5, 60.0)]),
            Symbol::normal("LP4", 11.0, &[(3, 2.0), (4, 10.0), (5, 40.0)]),
            Symbol::normal("LP5", 12.0, &[(3, 1.0), (4, 5.0), (5, 20.0)]),
            Symbol::wild("WILD", 2.0, &[(3, 50.0), (4, 200.0), (5, 1000.0)]),
            Symbol::scatter("SCATTER", 1.5),
            Symbol::bonus("BONUS", 1.0),
        ];

        // Static table above is valid by construction
        Self::new(symbols).expect("standard catalog is valid")
    }

    /// Look up a symbol by id
    pub fn get(&self, id: &str) -> Option<&Symbol> {
        self.index.get(id).map(|&i| &self.symbols[i])
    }

    /// All symbols in stable catalog order
    pub fn all(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Symbol count
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Mapping id → weight, catalog order
    pub fn weights(&self) -> Vec<(&str, f64)> {
        self.symbols
            .iter()
            .map(|s| (s.id.as_str(), s.weight))
            .collect()
    }

    /// Cached sum of all weights
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn is_wild(&self, id: &str) -> bool {
        self.get(id).is_some_and(|s| s.role == SymbolRole::Wild)
    }

    /// Wild, scatter or bonus
    pub fn is_special(&self, id: &str) -> bool {
        self.get(id).is_some_and(|s| s.is_special())
    }

    /// First wild id in catalog order, if any
    pub fn wild_id(&self) -> Option<&str> {
        self.symbols
            .iter()
            .find(|s| s.role == SymbolRole::Wild)
            .map(|s| s.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_pay() {
        let symbol = Symbol::normal("HP1", 1.0, &[(3, 20.0), (4, 100.0), (5, 500.0)]);
        assert_eq!(symbol.pay(2), 0.0);
        assert_eq!(symbol.pay(3), 20.0);
        assert_eq!(symbol.pay(5), 500.0);
        assert_eq!(symbol.pay(6), 0.0);
    }

    #[test]
    fn test_standard_catalog() {
        let catalog = SymbolCatalog::standard();
        assert!(catalog.get("WILD").is_some());
        assert!(catalog.is_wild("WILD"));
        assert!(catalog.is_special("SCATTER"));
        assert!(catalog.is_special("BONUS"));
        assert!(!catalog.is_special("HP1"));
        assert!(catalog.total_weight() > 0.0);
    }

    #[test]
    fn test_catalog_order_is_stable() {
        let catalog = SymbolCatalog::standard();
        let first: Vec<&str> = catalog.all().map(|s| s.id.as_str()).collect();
        let second: Vec<&str> = catalog.all().map(|s| s.id.as_str()).collect();
        assert_eq!(first, second);
        assert_eq!(first[0], "HP1");
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = SymbolCatalog::new(vec![
            Symbol::normal("A", 1.0, &[]),
            Symbol::normal("A", 2.0, &[]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_bad_weight() {
        assert!(SymbolCatalog::new(vec![Symbol::normal("A", 0.0, &[])]).is_err());
        assert!(SymbolCatalog::new(vec![Symbol::normal("A", -1.0, &[])]).is_err());
        assert!(SymbolCatalog::new(vec![Symbol::normal("A", f64::NAN, &[])]).is_err());
        assert!(SymbolCatalog::new(Vec::new()).is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let catalog = SymbolCatalog::standard();
        let symbols: Vec<Symbol> = catalog.all().cloned().collect();
        let json = serde_json::to_string(&symbols).unwrap();
        let back: Vec<Symbol> = serde_json::from_str(&json).unwrap();
        let rebuilt = SymbolCatalog::new(back).unwrap();
        assert_eq!(rebuilt.len(), catalog.len());
        assert_eq!(rebuilt.get("HP1").unwrap().pay(5), 500.0);
    }
}
