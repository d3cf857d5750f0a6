//! Field name resolution
//!
//! Maps qualified names such as `global.GovDiv` or `setup1.TailGainA` to the
//! namespace byte and table index the device expects. The tables themselves
//! are external data: each is an ordered list of names whose position is
//! the wire address.
//!
//! ## Table File Format
//! ```toml
//! global = ["RxType", "GovDiv", ...]
//! setup  = ["TailGainA", ...]        # shared by setup1..setup3
//! ```

use std::fs;
use std::num::IntErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::config::Config;
use crate::error::{BrainError, Result};
use crate::protocol::{FieldAddress, Namespace};

/// Largest table a one-byte address can index
pub const MAX_TABLE_LEN: usize = 256;

/// Looks up a field name within one namespace
pub trait FieldResolver {
    /// Index of `name` in the table for `namespace`, if present
    fn lookup(&self, namespace: Namespace, name: &str) -> Option<u8>;
}

/// The two field tables of one firmware revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTables {
    global: Vec<String>,
    setup: Vec<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TableFile {
    global: Vec<String>,
    setup: Vec<String>,
}

impl FieldTables {
    /// Build tables from ordered name lists
    pub fn new<G, S>(global: G, setup: S) -> Result<Self>
    where
        G: IntoIterator,
        G::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        let global: Vec<String> = global.into_iter().map(Into::into).collect();
        let setup: Vec<String> = setup.into_iter().map(Into::into).collect();

        for (which, table) in [("global", &global), ("setup", &setup)] {
            if table.len() > MAX_TABLE_LEN {
                return Err(BrainError::Config(format!(
                    "{} table has {} fields, at most {} are addressable",
                    which,
                    table.len(),
                    MAX_TABLE_LEN
                )));
            }
        }

        Ok(Self { global, setup })
    }

    /// Parse tables from a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: TableFile = toml::from_str(text)
            .map_err(|e| BrainError::Config(format!("invalid field table: {}", e)))?;
        Self::new(file.global, file.setup)
    }

    /// Load tables from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let tables = Self::from_toml_str(&text)?;

        tracing::debug!(
            path = %path.display(),
            global = tables.global.len(),
            setup = tables.setup.len(),
            "Loaded field tables"
        );

        Ok(tables)
    }

    /// Load the tables named by `config.field_table`
    pub fn from_config(config: &Config) -> Result<Self> {
        let path = config
            .field_table
            .as_ref()
            .ok_or_else(|| BrainError::Config("no field table file given".to_string()))?;
        Self::load(path)
    }

    /// Table used by `namespace`
    pub fn table(&self, namespace: Namespace) -> &[String] {
        if namespace.is_global() {
            &self.global
        } else {
            &self.setup
        }
    }

    /// Every qualified field name: global fields, then setup1..setup3
    pub fn qualified_names(&self) -> impl Iterator<Item = String> + '_ {
        Namespace::ALL.into_iter().flat_map(move |ns| {
            self.table(ns)
                .iter()
                .map(move |name| format!("{}.{}", ns, name))
        })
    }
}

impl FieldResolver for FieldTables {
    fn lookup(&self, namespace: Namespace, name: &str) -> Option<u8> {
        self.table(namespace)
            .iter()
            .position(|field| field == name)
            .and_then(|index| u8::try_from(index).ok())
    }
}

/// Resolve `"<namespace>.<name>"` to a field address
pub fn resolve_name<R: FieldResolver + ?Sized>(resolver: &R, qualified: &str) -> Result<FieldAddress> {
    let Some((ns_token, name)) = qualified.split_once('.') else {
        return Err(BrainError::Syntax(qualified.to_string()));
    };
    if name.contains('.') {
        return Err(BrainError::Syntax(qualified.to_string()));
    }

    let namespace: Namespace = ns_token.parse()?;
    let address = resolver
        .lookup(namespace, name)
        .ok_or_else(|| BrainError::UnknownField {
            namespace: namespace.to_string(),
            name: name.to_string(),
        })?;

    Ok(FieldAddress::new(namespace, address))
}

// =============================================================================
// Operator Input
// =============================================================================

/// Parse an integer in decimal, `0x` hex, `0o` octal or `0b` binary
///
/// Decimal literals may not carry leading zeros (`010` is rejected, `00` is
/// zero). Literals too large for an `i64` are reported as `Range`.
pub fn parse_value(text: &str) -> Result<i64> {
    let invalid = || BrainError::Config(format!("invalid integer value {:?}", text));

    let trimmed = text.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let prefix = digits.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits) = match prefix.as_deref() {
        Some("0x") => (16, &digits[2..]),
        Some("0o") => (8, &digits[2..]),
        Some("0b") => (2, &digits[2..]),
        _ => (10, digits),
    };

    // from_str_radix would otherwise accept a second sign
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(invalid());
    }

    if radix == 10 && digits.starts_with('0') && digits.bytes().any(|b| b != b'0') {
        return Err(invalid());
    }

    // Parse with the sign attached so i64::MIN is reachable
    let signed = if negative {
        format!("-{}", digits)
    } else {
        digits.to_string()
    };

    i64::from_str_radix(&signed, radix).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => BrainError::Range(i64::MAX),
        IntErrorKind::NegOverflow => BrainError::Range(i64::MIN),
        _ => invalid(),
    })
}

/// Split a `name=value` write request
pub fn parse_assignment(text: &str) -> Result<(&str, i64)> {
    match text.split_once('=') {
        Some((name, value)) if !value.contains('=') => Ok((name, parse_value(value)?)),
        _ => Err(BrainError::Config(format!(
            "invalid name=val write string {:?}",
            text
        ))),
    }
}
