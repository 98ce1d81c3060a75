use crate::dataset::{CategoricalAttribute, ProjectDataset};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("unknown {} category '{value}'", .attribute.label())]
    UnknownCategory {
        attribute: CategoricalAttribute,
        value: String,
    },
    #[error("no {} category has code {code}", .attribute.label())]
    UnknownCode {
        attribute: CategoricalAttribute,
        code: usize,
    },
    #[error("no code table was built for {}", .0.label())]
    NotFitted(CategoricalAttribute),
}

impl EncodingError {
    pub fn attribute(&self) -> CategoricalAttribute {
        match self {
            Self::UnknownCategory { attribute, .. } | Self::UnknownCode { attribute, .. } => {
                *attribute
            }
            Self::NotFitted(attribute) => *attribute,
        }
    }
}

/// Bijection between the distinct values of one categorical column and the
/// dense codes `0..k`. Codes follow the sorted order of the values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCodeTable {
    attribute: CategoricalAttribute,
    classes: Vec<String>,
    codes: HashMap<String, usize>,
}

impl CategoryCodeTable {
    pub fn fit<'a, I>(attribute: CategoricalAttribute, values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let classes: Vec<String> = values
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();
        let codes = classes
            .iter()
            .enumerate()
            .map(|(code, value)| (value.clone(), code))
            .collect();

        Self {
            attribute,
            classes,
            codes,
        }
    }

    pub fn attribute(&self) -> CategoricalAttribute {
        self.attribute
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn encode(&self, value: &str) -> Result<usize, EncodingError> {
        self.codes
            .get(value)
            .copied()
            .ok_or_else(|| EncodingError::UnknownCategory {
                attribute: self.attribute,
                value: value.to_string(),
            })
    }

    pub fn decode(&self, code: usize) -> Result<&str, EncodingError> {
        self.classes
            .get(code)
            .map(String::as_str)
            .ok_or(EncodingError::UnknownCode {
                attribute: self.attribute,
                code,
            })
    }
}

/// One code table per categorical attribute, built from a single dataset and
/// read-only afterwards. The dataset itself is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalEncoder {
    tables: BTreeMap<CategoricalAttribute, CategoryCodeTable>,
}

impl CategoricalEncoder {
    pub fn fit(dataset: &ProjectDataset, attributes: &[CategoricalAttribute]) -> Self {
        let tables = attributes
            .iter()
            .map(|&attribute| {
                let table = CategoryCodeTable::fit(attribute, dataset.column(attribute));
                (attribute, table)
            })
            .collect();

        Self { tables }
    }

    pub fn for_dataset(dataset: &ProjectDataset) -> Self {
        Self::fit(dataset, &CategoricalAttribute::ordered())
    }

    pub fn table(
        &self,
        attribute: CategoricalAttribute,
    ) -> Result<&CategoryCodeTable, EncodingError> {
        self.tables
            .get(&attribute)
            .ok_or(EncodingError::NotFitted(attribute))
    }

    pub fn encode(
        &self,
        attribute: CategoricalAttribute,
        value: &str,
    ) -> Result<usize, EncodingError> {
        self.table(attribute)?.encode(value)
    }

    pub fn decode(
        &self,
        attribute: CategoricalAttribute,
        code: usize,
    ) -> Result<&str, EncodingError> {
        self.table(attribute)?.decode(code)
    }

    pub fn classes(&self, attribute: CategoricalAttribute) -> &[String] {
        self.tables
            .get(&attribute)
            .map(CategoryCodeTable::classes)
            .unwrap_or_default()
    }
}
