pub const API_NAME: &str = "[automobile-api]";

pub const DEFAULT_AUTO_TOPIC: &str = "AutoTopic";
pub const DEFAULT_UPDATE_AUTO_TOPIC: &str = "UpdateAutoTopic";

pub const ROLES_HEADER: &str = "x-user-roles";

pub const MEMORY_STORE_URL: &str = "memory://";
