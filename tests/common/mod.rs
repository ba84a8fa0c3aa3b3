//! Shared fixtures: an application configuration in the shape services
//! typically validate at start-up.

#![allow(dead_code)]

use tagpath::reflect_struct;

pub struct Log {
    pub level: String,
}

reflect_struct!(Log {
    level as "Level": r#"json:"level" validate:"required,oneof=debug info warn error panic fatal""#,
});

pub struct Server {
    pub graceful_shutdown_timeout_seconds: u16,
    pub port: u16,
    pub request_timeout_seconds: u16,
}

reflect_struct!(Server {
    graceful_shutdown_timeout_seconds as "GracefulShutdownTimeoutSeconds":
        r#"json:"gracefulShutdownTimeoutSeconds" validate:"min=0,max=60""#,
    port as "Port": r#"json:"port" validate:"required,min=1,max=65535""#,
    request_timeout_seconds as "RequestTimeoutSeconds":
        r#"json:"requestTimeoutSeconds,omitempty" validate:"required,min=1,max=60""#,
});

pub struct Redis {
    pub database: i32,
    pub host: String,
    pub password: String,
    pub port: u16,
}

reflect_struct!(Redis {
    database as "Database": r#"json:"database" validate:"min=0,max=15""#,
    host as "Host": r#"json:"host,omitempty" validate:"required,hostname""#,
    password as "Password": r#"json:"-" validate:"omitempty""#,
    port as "Port": r#"json:"port" validate:"required,min=1,max=65535""#,
});

pub struct Config {
    pub log: Log,
    pub server: Server,
    pub redis: Redis,
}

reflect_struct!(Config {
    log as "Log": r#"json:"log" validate:"required""#,
    server as "Server": r#"json:"server" validate:"required""#,
    redis as "Redis": r#"json:"redis" validate:"required""#,
});

/// A configuration that passes every rule.
pub fn valid_config() -> Config {
    Config {
        log: Log {
            level: "info".to_string(),
        },
        server: Server {
            graceful_shutdown_timeout_seconds: 10,
            port: 1312,
            request_timeout_seconds: 30,
        },
        redis: Redis {
            database: 0,
            host: "localhost".to_string(),
            password: String::new(),
            port: 6379,
        },
    }
}
