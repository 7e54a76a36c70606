/// Registry name for the primary line of history, whatever the git default branch is called.
pub const MAIN_TRACK: &str = "main";

pub const COMMIT_OUTPUT_ID: &str = "commit";
pub const COMMIT_URL_OUTPUT_ID: &str = "commit_url";

pub const EVENT_DELETE: &str = "delete";
pub const EVENT_PUSH: &str = "push";
pub const EVENT_WORKFLOW_DISPATCH: &str = "workflow_dispatch";

pub const REF_TYPE_BRANCH: &str = "branch";
pub const REF_TYPE_TAG: &str = "tag";

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Length of a hex-encoded git SHA-1.
pub const COMMIT_TAG_LEN: usize = 40;

pub const USER_AGENT: &str = concat!("trackpush/", env!("CARGO_PKG_VERSION"));
