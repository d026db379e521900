//! Shared constants for test infrastructure

pub const MAVEN_REPOSITORY: &str = "maven-releases";
pub const DOCKER_REPOSITORY: &str = "docker-hosted";
pub const NPM_REPOSITORY: &str = "npm-proxy";

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "admin123";
/// `Basic base64("admin:admin123")`
pub const BASIC_AUTH: &str = "Basic YWRtaW46YWRtaW4xMjM=";

pub const COMPACT_TASK_NAME: &str = "BlobStoreCleanUp";
pub const COMPACT_TASK_ID: &str = "0d4b3a2c-compact";

/// A host nothing listens on
pub const UNREACHABLE_HOST: &str = "http://127.0.0.1:1";
