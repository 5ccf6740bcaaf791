//! Print job values and their validation.

use thiserror::Error;

use crate::config::FieldSource;

/// Largest number of copies a single job may request.
pub const MAX_COPIES: u32 = 999;

/// Reasons a print job is rejected before reaching the layout engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    /// The SKU is empty.
    #[error("sku must not be empty")]
    EmptySku,

    /// The SKU contains a character outside `[A-Za-z0-9-]`.
    #[error("sku contains {ch:?}; only letters, digits and '-' are allowed")]
    InvalidSku {
        /// The first offending character.
        ch: char,
    },

    /// The batch identifier is empty.
    #[error("batch must not be empty")]
    EmptyBatch,

    /// The batch identifier contains a markup control character.
    #[error("batch contains {ch:?}, which would break the label markup")]
    InvalidBatch {
        /// The first offending character.
        ch: char,
    },

    /// Copies outside `1..=999`.
    #[error("copies must be between 1 and {MAX_COPIES}, got {0}")]
    CopiesOutOfRange(u32),
}

/// One request to print (or preview) a label.
///
/// Construct through [`PrintJob::new`]; a value of this type always holds a
/// valid SKU, batch and copy count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    sku: String,
    batch: String,
    copies: u32,
}

impl PrintJob {
    /// Validate and build a job.
    pub fn new(
        sku: impl Into<String>,
        batch: impl Into<String>,
        copies: u32,
    ) -> Result<Self, JobError> {
        let sku = sku.into();
        let batch = batch.into();

        if sku.is_empty() {
            return Err(JobError::EmptySku);
        }
        if let Some(ch) = sku
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-'))
        {
            return Err(JobError::InvalidSku { ch });
        }

        if batch.is_empty() {
            return Err(JobError::EmptyBatch);
        }
        if let Some(ch) = batch.chars().find(|c| is_markup_control(*c)) {
            return Err(JobError::InvalidBatch { ch });
        }

        if !(1..=MAX_COPIES).contains(&copies) {
            return Err(JobError::CopiesOutOfRange(copies));
        }

        Ok(Self { sku, batch, copies })
    }

    /// The product SKU.
    pub fn sku(&self) -> &str {
        &self.sku
    }

    /// The batch identifier.
    pub fn batch(&self) -> &str {
        &self.batch
    }

    /// Number of labels to print.
    pub fn copies(&self) -> u32 {
        self.copies
    }

    /// The text a field with the given source prints.
    pub fn text(&self, source: FieldSource) -> &str {
        match source {
            FieldSource::Sku => &self.sku,
            FieldSource::Batch => &self.batch,
        }
    }
}

/// `true` for characters that terminate or redirect ZPL field data: the
/// format (`^`) and control (`~`) prefixes and ASCII control bytes.
pub fn is_markup_control(ch: char) -> bool {
    ch == '^' || ch == '~' || ch.is_ascii_control()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_job() {
        let job = PrintJob::new("ToGD-01", "12345", 3).unwrap();
        assert_eq!(job.sku(), "ToGD-01");
        assert_eq!(job.batch(), "12345");
        assert_eq!(job.copies(), 3);
        assert_eq!(job.text(FieldSource::Sku), "ToGD-01");
        assert_eq!(job.text(FieldSource::Batch), "12345");
    }

    #[test]
    fn batch_allows_spaces_and_punctuation() {
        assert!(PrintJob::new("A1", "LOT 2024/07.b", 1).is_ok());
    }

    #[test]
    fn empty_sku_rejected() {
        assert_eq!(PrintJob::new("", "B1", 1), Err(JobError::EmptySku));
    }

    #[test]
    fn sku_pattern_enforced() {
        assert_eq!(
            PrintJob::new("AB C", "B1", 1),
            Err(JobError::InvalidSku { ch: ' ' })
        );
        assert_eq!(
            PrintJob::new("AB^XZ", "B1", 1),
            Err(JobError::InvalidSku { ch: '^' })
        );
        assert_eq!(
            PrintJob::new("ÄB", "B1", 1),
            Err(JobError::InvalidSku { ch: 'Ä' })
        );
    }

    #[test]
    fn empty_batch_rejected() {
        assert_eq!(PrintJob::new("A1", "", 1), Err(JobError::EmptyBatch));
    }

    #[test]
    fn batch_control_characters_rejected() {
        assert_eq!(
            PrintJob::new("A1", "B^FS", 1),
            Err(JobError::InvalidBatch { ch: '^' })
        );
        assert_eq!(
            PrintJob::new("A1", "~JA", 1),
            Err(JobError::InvalidBatch { ch: '~' })
        );
        assert_eq!(
            PrintJob::new("A1", "B1\n", 1),
            Err(JobError::InvalidBatch { ch: '\n' })
        );
    }

    #[test]
    fn copies_range() {
        assert_eq!(
            PrintJob::new("A1", "B1", 0),
            Err(JobError::CopiesOutOfRange(0))
        );
        assert_eq!(
            PrintJob::new("A1", "B1", 1000),
            Err(JobError::CopiesOutOfRange(1000))
        );
        assert!(PrintJob::new("A1", "B1", 1).is_ok());
        assert!(PrintJob::new("A1", "B1", MAX_COPIES).is_ok());
    }
}
