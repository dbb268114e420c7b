use lazy_static::lazy_static;
use thiserror::Error;

use crate::operator::{Associativity, Operator, Symbol, Unary};

lazy_static! {
    static ref STANDARD: Registry = standard_table();
}

/// Errors raised while assembling a custom [`Registry`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("symbol `{symbol}` refers to unknown operator family `{sign}`")]
    UnknownFamily { symbol: String, sign: String },

    #[error("symbol `{0}` is registered twice")]
    DuplicateSymbol(String),

    #[error("operator family `{0}` is registered twice")]
    DuplicateFamily(String),

    #[error("symbols must not be empty or contain whitespace")]
    InvalidSymbol,
}

/// Read-only lookup table from formula symbols to operator families.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    operators: Vec<Operator>,
    /// Sorted longest text first so that scanning tries `\cdot` before `\c…`
    symbols: Vec<Symbol>,
}

impl Registry {
    /// The table every formula is parsed with unless told otherwise.
    pub fn standard() -> &'static Registry {
        &STANDARD
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Operator family by canonical sign.
    pub fn operator(&self, sign: &str) -> Option<&Operator> {
        self.operators.iter().find(|op| op.sign == sign)
    }

    /// Symbol by exact source text.
    pub fn symbol(&self, text: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|sym| sym.text == text)
    }

    /// Symbol together with the family it belongs to.
    pub fn resolve(&self, text: &str) -> Option<(&Symbol, &Operator)> {
        let symbol = self.symbol(text)?;
        let operator = self.operator(&symbol.sign)?;
        Some((symbol, operator))
    }

    /// Symbols in scan order (longest first).
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn operators(&self) -> impl Iterator<Item = &Operator> {
        self.operators.iter()
    }
}

/// Incrementally assembles a [`Registry`], validating it on [`build`](Self::build).
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    operators: Vec<Operator>,
    symbols: Vec<Symbol>,
}

impl RegistryBuilder {
    pub fn operator(mut self, operator: Operator) -> Self {
        self.operators.push(operator);
        self
    }

    pub fn symbol(mut self, symbol: Symbol) -> Self {
        self.symbols.push(symbol);
        self
    }

    pub fn build(self) -> Result<Registry, RegistryError> {
        let RegistryBuilder {
            operators,
            mut symbols,
        } = self;

        for (i, op) in operators.iter().enumerate() {
            if operators[..i].iter().any(|other| other.sign == op.sign) {
                return Err(RegistryError::DuplicateFamily(op.sign.to_string()));
            }
        }

        for (i, sym) in symbols.iter().enumerate() {
            if sym.text.is_empty() || sym.text.chars().any(char::is_whitespace) {
                return Err(RegistryError::InvalidSymbol);
            }
            if symbols[..i].iter().any(|other| other.text == sym.text) {
                return Err(RegistryError::DuplicateSymbol(sym.text.to_string()));
            }
            if !operators.iter().any(|op| op.sign == sym.sign) {
                return Err(RegistryError::UnknownFamily {
                    symbol: sym.text.to_string(),
                    sign: sym.sign.to_string(),
                });
            }
        }

        // Stable: equal-length symbols keep registration order
        symbols.sort_by(|a, b| b.text.len().cmp(&a.text.len()));

        #[cfg(feature = "logging")]
        log::debug!(
            "registry built with {} families and {} symbols",
            operators.len(),
            symbols.len()
        );

        Ok(Registry { operators, symbols })
    }
}

fn standard_table() -> Registry {
    let built = Registry::builder()
        .operator(Operator::new("=", 10, true, Associativity::Left))
        .operator(Operator::new("+", 13, true, Associativity::Left))
        .operator(Operator::new("*", 14, true, Associativity::Left))
        .operator(Operator::new("^", 15, false, Associativity::Right))
        .symbol(Symbol::new("=", "="))
        .symbol(Symbol::new("+", "+").allow_prefix())
        .symbol(Symbol::new("-", "+").with_unary(Unary::Negate).allow_prefix())
        .symbol(Symbol::new("*", "*"))
        .symbol(Symbol::new("\\cdot", "*"))
        .symbol(Symbol::new("\\times", "*"))
        .symbol(Symbol::new("\\ast", "*"))
        .symbol(Symbol::new("/", "*").with_unary(Unary::Reciprocal))
        .symbol(Symbol::new("\\div", "*").with_unary(Unary::Reciprocal))
        .symbol(Symbol::new("^", "^"))
        .build();

    match built {
        Ok(registry) => registry,
        // The table above is fixed; a failure here is a programming error.
        Err(err) => panic!("standard operator table is invalid: {err}"),
    }
}
