//! Per-locale formatting tables
//!
//! Each supported locale variant carries constant temporal, numeric and
//! currency conventions. The tables are `'static` and only ever handed out
//! as copies, so callers cannot tamper with the shared definitions.
//!
//! Date and time patterns use `Y`, `m`, `d`, `H`, `i` and `s` tokens
//! (four-digit year, month, day, hour, minute, second).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Temporal conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Temporal {
    /// Order of date parts, made of the chars `Y`, `m` and `d`
    pub date_part_sequence: &'static str,
    pub date_short: &'static str,
    pub date_long: &'static str,
    pub time_short: &'static str,
    pub time_long: &'static str,
    /// Lowercase English weekday name
    pub weekday_first: &'static str,
}

impl Temporal {
    /// Look up one setting by its camelCase name
    pub fn get(&self, key: &str) -> Option<&'static str> {
        match key {
            "datePartSequence" => Some(self.date_part_sequence),
            "dateShort" => Some(self.date_short),
            "dateLong" => Some(self.date_long),
            "timeShort" => Some(self.time_short),
            "timeLong" => Some(self.time_long),
            "weekdayFirst" => Some(self.weekday_first),
            _ => None,
        }
    }
}

/// Numeric conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Numeric {
    pub decimal_mark: &'static str,
    pub thousand_separator: &'static str,
    /// Suffix replacing the fraction of a whole amount, like `,-`
    pub no_fraction_mark: &'static str,
}

impl Numeric {
    /// Look up one setting by its camelCase name
    pub fn get(&self, key: &str) -> Option<&'static str> {
        match key {
            "decimalMark" => Some(self.decimal_mark),
            "thousandSeparator" => Some(self.thousand_separator),
            "noFractionMark" => Some(self.no_fraction_mark),
            _ => None,
        }
    }
}

/// A currency used in a locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Currency {
    pub title: &'static str,
    /// ISO 4217 code
    pub abbreviation: &'static str,
    pub sign: &'static str,
}

/// Supported locale profile variants
///
/// Selected from configuration through the `locale_to_class` table, whose
/// values are the kebab-case names of these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocaleVariant {
    DaDk,
    EnGb,
    EnUs,
}

const DA_DK_TEMPORAL: Temporal = Temporal {
    date_part_sequence: "dmY",
    date_short: "d-m-Y",
    date_long: "d-m-Y H:i",
    time_short: "H:i",
    time_long: "H:i:s",
    weekday_first: "monday",
};

const DA_DK_NUMERIC: Numeric = Numeric {
    decimal_mark: ",",
    thousand_separator: ".",
    no_fraction_mark: ",-",
};

const DA_DK_CURRENCY: &[Currency] = &[
    Currency {
        title: "Danske kroner",
        abbreviation: "DKK",
        sign: "kr",
    },
    Currency {
        title: "Euro",
        abbreviation: "EUR",
        sign: "€",
    },
];

const EN_GB_TEMPORAL: Temporal = Temporal {
    date_part_sequence: "dmY",
    date_short: "d/m/Y",
    date_long: "d/m/Y H:i",
    time_short: "H:i",
    time_long: "H:i:s",
    weekday_first: "monday",
};

const EN_GB_NUMERIC: Numeric = Numeric {
    decimal_mark: ".",
    thousand_separator: ",",
    no_fraction_mark: "/-",
};

const EN_GB_CURRENCY: &[Currency] = &[
    Currency {
        title: "British Pound",
        abbreviation: "GBP",
        sign: "£",
    },
    Currency {
        title: "Euro",
        abbreviation: "EUR",
        sign: "€",
    },
];

const EN_US_TEMPORAL: Temporal = Temporal {
    date_part_sequence: "mdY",
    date_short: "m/d/Y",
    date_long: "m/d/Y H:i",
    time_short: "H:i",
    time_long: "H:i:s",
    weekday_first: "sunday",
};

const EN_US_NUMERIC: Numeric = Numeric {
    decimal_mark: ".",
    thousand_separator: " ",
    no_fraction_mark: "/-",
};

const EN_US_CURRENCY: &[Currency] = &[Currency {
    title: "US Dollar",
    abbreviation: "USD",
    sign: "$",
}];

impl LocaleVariant {
    /// Every variant, in declaration order
    pub const ALL: [LocaleVariant; 3] = [Self::DaDk, Self::EnGb, Self::EnUs];

    /// Kebab-case identifier used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DaDk => "da-dk",
            Self::EnGb => "en-gb",
            Self::EnUs => "en-us",
        }
    }

    /// Locale code the variant natively describes
    pub fn locale(&self) -> &'static str {
        self.as_str()
    }

    /// Copy of the temporal conventions
    pub fn temporal(&self) -> Temporal {
        match self {
            Self::DaDk => DA_DK_TEMPORAL,
            Self::EnGb => EN_GB_TEMPORAL,
            Self::EnUs => EN_US_TEMPORAL,
        }
    }

    /// Copy of the numeric conventions
    pub fn numeric(&self) -> Numeric {
        match self {
            Self::DaDk => DA_DK_NUMERIC,
            Self::EnGb => EN_GB_NUMERIC,
            Self::EnUs => EN_US_NUMERIC,
        }
    }

    /// Copy of all currencies, default first
    pub fn currency(&self) -> Vec<Currency> {
        self.currencies().to_vec()
    }

    /// The locale's default currency
    pub fn currency_default(&self) -> Currency {
        // Every table above has at least one entry.
        self.currencies()[0]
    }

    fn currencies(&self) -> &'static [Currency] {
        match self {
            Self::DaDk => DA_DK_CURRENCY,
            Self::EnGb => EN_GB_CURRENCY,
            Self::EnUs => EN_US_CURRENCY,
        }
    }

    /// Snapshot of every table, for printing and export
    pub fn profile(&self) -> LocaleProfile {
        LocaleProfile {
            variant: *self,
            temporal: self.temporal(),
            numeric: self.numeric(),
            currency: self.currency(),
        }
    }
}

impl fmt::Display for LocaleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocaleVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.as_str() == s)
            .ok_or_else(|| Error::config(format!("unknown locale profile variant '{s}'")))
    }
}

/// Owned copy of a variant's formatting tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleProfile {
    pub variant: LocaleVariant,
    pub temporal: Temporal,
    pub numeric: Numeric,
    pub currency: Vec<Currency>,
}
