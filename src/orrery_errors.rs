use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrreryError {
    #[error("Unable to read ephemeris dataset {path}: {source}")]
    DatasetUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt ephemeris dataset: {0}")]
    DatasetCorrupt(String),

    #[error("Julian date {jd} is outside the ephemeris coverage [{start}, {end}]")]
    EphemerisOutOfRange { jd: f64, start: f64, end: f64 },

    #[error("Line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Item '{item}' references undefined object '{reference}'")]
    UnresolvedReference { item: String, reference: String },

    #[error("Item '{0}' is part of a reference cycle")]
    CyclicReference(String),

    #[error("Invalid catalog item '{item}': {message}")]
    InvalidItem { item: String, message: String },

    #[error("No entity named '{0}' in the universe catalog")]
    UnknownEntity(String),

    #[error("Unsupported catalog file format: {0}")]
    UnsupportedCatalogFormat(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid epoch: {0}")]
    InvalidEpoch(String),

    #[error("Kepler equation did not converge (M = {mean_anomaly}, e = {eccentricity})")]
    KeplerDivergence {
        mean_anomaly: f64,
        eccentricity: f64,
    },

    #[error("SGP4 propagation of '{satellite}' failed: {message}")]
    PropagationFailed { satellite: String, message: String },

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl OrreryError {
    /// Shorthand used by the catalog code to attach an item name to a message.
    pub(crate) fn invalid_item(item: &str, message: impl Into<String>) -> Self {
        OrreryError::InvalidItem {
            item: item.to_string(),
            message: message.into(),
        }
    }
}

impl PartialEq for OrreryError {
    fn eq(&self, other: &Self) -> bool {
        use OrreryError::*;
        match (self, other) {
            // I/O sources are not comparable: same variant and path is enough
            (DatasetUnreadable { path: a, .. }, DatasetUnreadable { path: b, .. }) => a == b,
            (IoError(_), IoError(_)) => true,

            (DatasetCorrupt(a), DatasetCorrupt(b)) => a == b,
            (
                EphemerisOutOfRange {
                    jd: a,
                    start: sa,
                    end: ea,
                },
                EphemerisOutOfRange {
                    jd: b,
                    start: sb,
                    end: eb,
                },
            ) => a == b && sa == sb && ea == eb,
            (
                ParseError {
                    line: la,
                    message: ma,
                },
                ParseError {
                    line: lb,
                    message: mb,
                },
            ) => la == lb && ma == mb,
            (
                UnresolvedReference {
                    item: ia,
                    reference: ra,
                },
                UnresolvedReference {
                    item: ib,
                    reference: rb,
                },
            ) => ia == ib && ra == rb,
            (CyclicReference(a), CyclicReference(b)) => a == b,
            (
                InvalidItem {
                    item: ia,
                    message: ma,
                },
                InvalidItem {
                    item: ib,
                    message: mb,
                },
            ) => ia == ib && ma == mb,
            (UnknownEntity(a), UnknownEntity(b)) => a == b,
            (UnsupportedCatalogFormat(a), UnsupportedCatalogFormat(b)) => a == b,
            (InvalidQuantity(a), InvalidQuantity(b)) => a == b,
            (InvalidEpoch(a), InvalidEpoch(b)) => a == b,
            (
                KeplerDivergence {
                    mean_anomaly: ma,
                    eccentricity: ea,
                },
                KeplerDivergence {
                    mean_anomaly: mb,
                    eccentricity: eb,
                },
            ) => ma == mb && ea == eb,
            (
                PropagationFailed {
                    satellite: sa,
                    message: ma,
                },
                PropagationFailed {
                    satellite: sb,
                    message: mb,
                },
            ) => sa == sb && ma == mb,

            _ => false,
        }
    }
}
