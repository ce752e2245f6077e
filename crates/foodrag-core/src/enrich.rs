//! Enrichment: appends descriptive clauses built from a record's optional
//! fields to its text before the index embeds it, and mirrors those fields
//! into the entry metadata.
//!
//! Clauses are always emitted in the order region, type, dietary, nutritional
//! highlights, whatever order the field set was configured in. A field in the
//! set that the record lacks adds no clause and is stored as `""`.

use serde::{Deserialize, Serialize};

use crate::types::{EnrichedDocument, FoodRecord, Metadata, ORIGINAL_TEXT_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichField {
    Region,
    Type,
    Dietary,
    NutritionalHighlights,
}

impl EnrichField {
    pub const ALL: [EnrichField; 4] =
        [EnrichField::Region, EnrichField::Type, EnrichField::Dietary, EnrichField::NutritionalHighlights];

    /// Metadata key, identical to the dataset field name.
    pub fn key(self) -> &'static str {
        match self {
            EnrichField::Region => "region",
            EnrichField::Type => "type",
            EnrichField::Dietary => "dietary",
            EnrichField::NutritionalHighlights => "nutritional_highlights",
        }
    }

    fn value(self, record: &FoodRecord) -> Option<String> {
        let value = match self {
            EnrichField::Region => record.region.clone(),
            EnrichField::Type => record.kind.clone(),
            EnrichField::Dietary => record.dietary.as_ref().map(|tags| {
                tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()).collect::<Vec<_>>().join(", ")
            }),
            EnrichField::NutritionalHighlights => record.nutritional_highlights.clone(),
        }?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn clause(self, value: &str) -> String {
        match self {
            EnrichField::Region => format!(" This food is popular in {value}."),
            EnrichField::Type => format!(" It is a type of {value}."),
            EnrichField::Dietary => format!(" Dietary info: {value}."),
            EnrichField::NutritionalHighlights => format!(" Nutritional benefits: {value}."),
        }
    }
}

/// The optional fields folded into each document, kept in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet(Vec<EnrichField>);

impl FieldSet {
    pub fn new(fields: &[EnrichField]) -> Self {
        let mut fields = fields.to_vec();
        fields.sort();
        fields.dedup();
        Self(fields)
    }

    /// Region and type only.
    pub fn basic() -> Self {
        Self(vec![EnrichField::Region, EnrichField::Type])
    }

    pub fn full() -> Self {
        Self(EnrichField::ALL.to_vec())
    }

    pub fn fields(&self) -> &[EnrichField] {
        &self.0
    }

    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|f| f.key().to_string()).collect()
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self::full()
    }
}

pub fn enrich(record: &FoodRecord, fields: &FieldSet) -> EnrichedDocument {
    let mut text = record.text.clone();
    let mut metadata = Metadata::new();
    metadata.insert(ORIGINAL_TEXT_KEY.to_string(), record.text.clone());
    for field in fields.fields() {
        let value = field.value(record);
        if let Some(value) = &value {
            text.push_str(&field.clause(value));
        }
        metadata.insert(field.key().to_string(), value.unwrap_or_default());
    }
    EnrichedDocument { id: record.id.clone(), text, metadata }
}

pub fn enrich_all(records: &[FoodRecord], fields: &FieldSet) -> Vec<EnrichedDocument> {
    records.iter().map(|r| enrich(r, fields)).collect()
}
