//! Dataset Schema
//! Canonical column names and categorical domains of the student performance file.

/// Canonical column names (after normalization).
pub const GENDER: &str = "gender";
pub const RACE_ETHNICITY: &str = "race_ethnicity";
pub const PARENTAL_EDUCATION: &str = "parental_level_of_education";
pub const LUNCH: &str = "lunch";
pub const TEST_PREPARATION: &str = "test_preparation_course";
pub const MATH_SCORE: &str = "math_score";
pub const READING_SCORE: &str = "reading_score";
pub const WRITING_SCORE: &str = "writing_score";

/// Score columns in reporting order.
pub const SCORE_COLUMNS: [&str; 3] = [MATH_SCORE, READING_SCORE, WRITING_SCORE];

/// Every column the normalized raw table must carry.
pub const EXPECTED_COLUMNS: [&str; 8] = [
    GENDER,
    RACE_ETHNICITY,
    PARENTAL_EDUCATION,
    LUNCH,
    TEST_PREPARATION,
    MATH_SCORE,
    READING_SCORE,
    WRITING_SCORE,
];

/// Parental education levels, lowest to highest.
pub const EDUCATION_ORDER: [&str; 6] = [
    "some high school",
    "high school",
    "some college",
    "associate's degree",
    "bachelor's degree",
    "master's degree",
];

/// Separator used in canonical column names.
pub const SEPARATOR: char = '_';

/// A two-valued categorical column with an exhaustive code table.
#[derive(Debug, Clone, Copy)]
pub struct BinaryField {
    pub column: &'static str,
    pub codes: &'static [(&'static str, i32)],
}

impl BinaryField {
    /// Look up the code for a raw value.
    pub fn code(&self, value: &str) -> Option<i32> {
        self.codes
            .iter()
            .find(|(label, _)| *label == value)
            .map(|(_, code)| *code)
    }
}

pub const BINARY_FIELDS: [BinaryField; 3] = [
    BinaryField {
        column: GENDER,
        codes: &[("female", 0), ("male", 1)],
    },
    BinaryField {
        column: LUNCH,
        codes: &[("free/reduced", 0), ("standard", 1)],
    },
    BinaryField {
        column: TEST_PREPARATION,
        codes: &[("none", 0), ("completed", 1)],
    },
];

/// A multi-valued categorical column expanded into indicator columns.
#[derive(Debug, Clone, Copy)]
pub struct CategoricalField {
    pub column: &'static str,
    pub levels: &'static [&'static str],
}

impl CategoricalField {
    /// Levels in lexicographic order; the first one is the dropped reference.
    pub fn sorted_levels(&self) -> Vec<&'static str> {
        let mut levels = self.levels.to_vec();
        levels.sort_unstable();
        levels
    }

    /// Levels that receive an indicator column (k - 1 of them).
    pub fn encoded_levels(&self) -> Vec<&'static str> {
        self.sorted_levels().into_iter().skip(1).collect()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.levels.contains(&value)
    }

    /// Name of the indicator column for `level`.
    pub fn indicator_name(&self, level: &str) -> String {
        normalize_column_name(&format!("{}{}{}", self.column, SEPARATOR, level))
    }
}

pub const ONE_HOT_FIELDS: [CategoricalField; 2] = [
    CategoricalField {
        column: RACE_ETHNICITY,
        levels: &["group A", "group B", "group C", "group D", "group E"],
    },
    CategoricalField {
        column: PARENTAL_EDUCATION,
        levels: &EDUCATION_ORDER,
    },
];

/// Canonical form of a column name: whitespace and slashes become `_`.
pub fn normalize_column_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' {
                SEPARATOR
            } else {
                c
            }
        })
        .collect()
}
