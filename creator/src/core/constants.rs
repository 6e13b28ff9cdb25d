// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "MdH Query Creator";

/// Application name in lowercase (for paths and log filters)
pub const APP_NAME_LOWER: &str = "mdh_query";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".mdh-query";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "mdh-query.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "MDH_QUERY_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "MDH_QUERY_LOG";

/// Environment variable to enable strict expression checks
pub const ENV_STRICT: &str = "MDH_QUERY_STRICT";

/// Environment variable for the number of filter slots
pub const ENV_MAX_FILTERS: &str = "MDH_QUERY_MAX_FILTERS";

// =============================================================================
// Filter Slots
// =============================================================================

/// Default number of filter slots: `f0` plus 20 appended filters
pub const DEFAULT_MAX_FILTERS: usize = 21;

/// Upper bound accepted for `creator.max_filters`
pub const MAX_FILTERS_LIMIT: usize = 100;

/// Prefix of a filter key (`f0`, `f1`, ...)
pub const FILTER_KEY_PREFIX: &str = "f";

/// Pattern matching filter keys inside a filter logic expression
pub const FILTER_KEY_PATTERN: &str = r"f\d+";

/// Deepest nesting of `not` and parentheses accepted in a filter logic
pub const MAX_LOGIC_DEPTH: usize = 64;

// =============================================================================
// Query Defaults
// =============================================================================

/// Filter logic used by a freshly created query
pub const DEFAULT_FILTER_LOGIC: &str = "f0";

/// Tags returned when the user does not choose any
pub const DEFAULT_SELECTED_TAGS: &[&str] = &[
    "SourceFile",
    "FileName",
    "FileSize",
    "FileType",
    "FileAccessDate",
];

/// Separator between selected tags in the raw parameter value
pub const SELECTED_TAGS_SEPARATOR: &str = ", ";

/// Tag identifying a file in query results
pub const SOURCE_FILE_TAG: &str = "SourceFile";

// =============================================================================
// Flow Variables
// =============================================================================

/// Key under which the query descriptor travels in a port payload
pub const FLOW_VARIABLE_QUERY: &str = "query";
