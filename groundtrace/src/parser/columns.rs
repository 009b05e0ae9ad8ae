//! Header keyword matching
//!
//! Harness spreadsheets come from different tools and languages, so columns
//! are found by keyword rather than by position or exact name. A rule is a
//! list of alternatives; an alternative matches a header when every one of
//! its keywords occurs in the lowercased header.

use crate::core::GroundTraceError;

/// A named column with its matching alternatives.
#[derive(Debug, Clone, Copy)]
pub struct ColumnRule {
    pub table: &'static str,
    pub field: &'static str,
    pub alternatives: &'static [&'static [&'static str]],
}

impl ColumnRule {
    pub fn matches(&self, header: &str) -> bool {
        let header = header.to_lowercase();
        self.alternatives
            .iter()
            .any(|keywords| keywords.iter().all(|k| header.contains(k)))
    }

    /// Human-readable form, e.g. `"wire" + "size" | "线径"`.
    pub fn describe(&self) -> String {
        self.alternatives
            .iter()
            .map(|keywords| {
                keywords
                    .iter()
                    .map(|k| format!("\"{}\"", k))
                    .collect::<Vec<_>>()
                    .join(" + ")
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Index of the first header matching this rule.
    pub fn find(&self, headers: &[String]) -> Option<usize> {
        headers.iter().position(|h| self.matches(h))
    }

    /// Indices of all headers matching this rule.
    pub fn find_all(&self, headers: &[String]) -> Vec<usize> {
        headers
            .iter()
            .enumerate()
            .filter(|(_, h)| self.matches(h))
            .map(|(i, _)| i)
            .collect()
    }

    fn require(&self, headers: &[String]) -> Result<usize, GroundTraceError> {
        self.find(headers).ok_or_else(|| GroundTraceError::MissingColumn {
            table: self.table.to_string(),
            column: self.field.to_string(),
        })
    }
}

pub const FROM_CODE: ColumnRule = ColumnRule {
    table: "wire list",
    field: "from code",
    alternatives: &[&["from code"], &["fromcode"]],
};

pub const TO_CODE: ColumnRule = ColumnRule {
    table: "wire list",
    field: "to code",
    alternatives: &[&["to code"], &["tocode"]],
};

pub const FROM_PIN: ColumnRule = ColumnRule {
    table: "wire list",
    field: "from pin",
    alternatives: &[&["from pin"], &["frompin"]],
};

pub const TO_PIN: ColumnRule = ColumnRule {
    table: "wire list",
    field: "to pin",
    alternatives: &[&["to pin"], &["topin"]],
};

pub const WIRE_SIZE: ColumnRule = ColumnRule {
    table: "wire list",
    field: "wire gauge",
    alternatives: &[&["wire", "size"], &["线径"]],
};

pub const OPTION: ColumnRule = ColumnRule {
    table: "wire list",
    field: "option",
    alternatives: &[&["option"]],
};

pub const SHORT_CODE: ColumnRule = ColumnRule {
    table: "connector list",
    field: "short code",
    alternatives: &[&["短号"], &["short code"], &["code"]],
};

pub const DESCRIPTION: ColumnRule = ColumnRule {
    table: "connector list",
    field: "description",
    alternatives: &[&["中文"], &["描述"], &["description"], &["desc"]],
};

pub const ENGLISH_DESCRIPTION: ColumnRule = ColumnRule {
    table: "connector list",
    field: "english description",
    alternatives: &[&["english"], &["英文"]],
};

pub const INLINE_CODE: ColumnRule = ColumnRule {
    table: "inline list",
    field: "inline code",
    alternatives: &[&["inline"], &["短号"], &["code"]],
};

/// Every rule, in the order they are listed to users.
pub const ALL_RULES: &[ColumnRule] = &[
    FROM_CODE,
    FROM_PIN,
    TO_CODE,
    TO_PIN,
    WIRE_SIZE,
    OPTION,
    SHORT_CODE,
    DESCRIPTION,
    ENGLISH_DESCRIPTION,
    INLINE_CODE,
];

/// Resolved wire list column indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireListColumns {
    pub from_code: usize,
    pub from_pin: usize,
    pub to_code: usize,
    pub to_pin: usize,
    pub wire_size: Option<usize>,
    pub option: Option<usize>,
}

impl WireListColumns {
    /// Each header is claimed by at most one field, checked in the order
    /// from code, to code, from pin, to pin, wire size, option.
    pub fn resolve(headers: &[String]) -> Result<Self, GroundTraceError> {
        let order = [FROM_CODE, TO_CODE, FROM_PIN, TO_PIN, WIRE_SIZE, OPTION];
        let mut slots: [Option<usize>; 6] = [None; 6];

        for (idx, header) in headers.iter().enumerate() {
            if let Some(field) = order.iter().position(|rule| rule.matches(header)) {
                if slots[field].is_none() {
                    slots[field] = Some(idx);
                }
            }
        }

        let required = |field: usize| {
            slots[field].ok_or_else(|| GroundTraceError::MissingColumn {
                table: order[field].table.to_string(),
                column: order[field].field.to_string(),
            })
        };

        Ok(Self {
            from_code: required(0)?,
            to_code: required(1)?,
            from_pin: required(2)?,
            to_pin: required(3)?,
            wire_size: slots[4],
            option: slots[5],
        })
    }
}

/// Resolved connector list column indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorListColumns {
    pub short_code: usize,
    /// Primary (usually Chinese) description columns.
    pub descriptions: Vec<usize>,
    pub english: Vec<usize>,
}

impl ConnectorListColumns {
    pub fn resolve(headers: &[String]) -> Result<Self, GroundTraceError> {
        let short_code = SHORT_CODE.require(headers)?;
        let english = ENGLISH_DESCRIPTION.find_all(headers);
        let descriptions = DESCRIPTION
            .find_all(headers)
            .into_iter()
            .filter(|idx| *idx != short_code && !english.contains(idx))
            .collect();

        Ok(Self {
            short_code,
            descriptions,
            english,
        })
    }
}
