//! Provider error codes grouped by the domain kind they signal
//!
//! Codes come from three services (identity, warehouse-cluster,
//! compute-network); each service spells its absence/presence signals
//! differently.

/// Codes that signal resource absence
pub const NOT_FOUND_CODES: &[&str] = &[
    "NoSuchEntity",
    "ClusterNotFound",
    "ClusterNotFoundFault",
    "InvalidPermission.NotFound",
    "InvalidGroup.NotFound",
];

/// Codes that signal the resource already exists
pub const ALREADY_EXISTS_CODES: &[&str] = &[
    "EntityAlreadyExists",
    "ClusterAlreadyExists",
    "ClusterAlreadyExistsFault",
    "InvalidPermission.Duplicate",
];

/// Codes that signal rate limiting
pub const THROTTLED_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "RequestLimitExceeded",
    "TooManyRequestsException",
];
