use std::fmt;

use crate::error::ModelError;

/// Binary diagnosis emitted by every classifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
pub enum Label {
    /// Class index 0.
    Benign = 0,
    /// Class index 1.
    Malignant = 1,
}

impl Label {
    /// Convert a zero-based class index into a label.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidLabel`] for any index other than 0 or 1.
    pub fn from_index(index: usize) -> Result<Self, ModelError> {
        match index {
            0 => Ok(Self::Benign),
            1 => Ok(Self::Malignant),
            _ => Err(ModelError::InvalidLabel { index }),
        }
    }

    /// Return the class index (0 for benign, 1 for malignant).
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Return `true` for [`Label::Malignant`].
    #[must_use]
    pub fn is_malignant(self) -> bool {
        self == Self::Malignant
    }

    /// Lower-case name of the label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Benign => "benign",
            Self::Malignant => "malignant",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip() {
        for label in [Label::Benign, Label::Malignant] {
            assert_eq!(Label::from_index(label.index()).unwrap(), label);
        }
    }

    #[test]
    fn out_of_range_index() {
        let err = Label::from_index(2).unwrap_err();
        assert!(matches!(err, ModelError::InvalidLabel { index: 2 }));
    }

    #[test]
    fn display_names() {
        assert_eq!(Label::Benign.to_string(), "benign");
        assert_eq!(Label::Malignant.to_string(), "malignant");
        assert!(Label::Malignant.is_malignant());
        assert!(!Label::Benign.is_malignant());
    }
}
