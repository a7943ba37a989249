use std::env;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use crate::optimizer::SolverConfig;

/// Complete application configuration, loaded from environment variables or default values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub solver: SolverEnvConfig,
    pub defaults: RequestDefaults,
}

impl AppConfig {
    /// Creates a configuration from the currently available environment variables.
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            solver: SolverEnvConfig::from_env(),
            defaults: RequestDefaults::from_env(),
        }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    bind_ip: IpAddr,
    display_host: String,
    port: u16,
}

impl ApiConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8080;
    const HOST_VAR: &'static str = "TRAY_FILL_API_HOST";
    const PORT_VAR: &'static str = "TRAY_FILL_API_PORT";

    fn from_env() -> Self {
        let (bind_ip, display_host) = resolve_host(env_string(Self::HOST_VAR));
        let port = resolve_port(env_string(Self::PORT_VAR));

        Self {
            bind_ip,
            display_host,
            port,
        }
    }

    /// Socket address to bind the server to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    /// Visible hostname for logging and hints.
    pub fn display_host(&self) -> &str {
        &self.display_host
    }

    /// Configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Indicates whether binding to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        match self.bind_ip {
            IpAddr::V4(addr) => addr == Ipv4Addr::UNSPECIFIED,
            IpAddr::V6(addr) => addr == Ipv6Addr::UNSPECIFIED,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            display_host: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
        }
    }
}

fn resolve_host(raw: Option<String>) -> (IpAddr, String) {
    let Some(host_value) = raw else {
        return (IpAddr::V4(Ipv4Addr::UNSPECIFIED), ApiConfig::DEFAULT_HOST.to_string());
    };
    match host_value.parse::<IpAddr>() {
        Ok(ip) => (ip, host_value),
        Err(err) => {
            eprintln!(
                "⚠️ Could not parse {} ('{}'): {}. Using {}.",
                ApiConfig::HOST_VAR,
                host_value,
                err,
                ApiConfig::DEFAULT_HOST
            );
            (IpAddr::V4(Ipv4Addr::UNSPECIFIED), ApiConfig::DEFAULT_HOST.to_string())
        }
    }
}

fn resolve_port(raw: Option<String>) -> u16 {
    match raw {
        Some(raw) => match raw.parse::<u16>() {
            Ok(value) if value != 0 => value,
            Ok(_) => {
                eprintln!(
                    "⚠️ {} must not be 0. Using {}.",
                    ApiConfig::PORT_VAR,
                    ApiConfig::DEFAULT_PORT
                );
                ApiConfig::DEFAULT_PORT
            }
            Err(err) => {
                eprintln!(
                    "⚠️ Could not parse {} ('{}'): {}. Using {}.",
                    ApiConfig::PORT_VAR,
                    raw,
                    err,
                    ApiConfig::DEFAULT_PORT
                );
                ApiConfig::DEFAULT_PORT
            }
        },
        None => ApiConfig::DEFAULT_PORT,
    }
}

/// Placer and width search tuning taken from the environment.
#[derive(Clone, Debug, Default)]
pub struct SolverEnvConfig {
    solver: SolverConfig,
}

impl SolverEnvConfig {
    const MARGIN_VAR: &'static str = "TRAY_FILL_MARGIN_X";
    const LARGE_CABLE_VAR: &'static str = "TRAY_FILL_LARGE_CABLE_THRESHOLD";
    const CEILING_VAR: &'static str = "TRAY_FILL_SIMULATION_CEILING";
    const COLLISION_VAR: &'static str = "TRAY_FILL_COLLISION_EPSILON";
    const SUPPORT_VAR: &'static str = "TRAY_FILL_SUPPORT_TOLERANCE";
    const MAX_WIDTH_VAR: &'static str = "TRAY_FILL_MAX_WIDTH";
    const ANGLE_STEP_VAR: &'static str = "TRAY_FILL_ANGLE_STEP";

    fn from_env() -> Self {
        let margin_x = load_f64_with_warning(
            Self::MARGIN_VAR,
            SolverConfig::DEFAULT_MARGIN_X,
            |value| value >= 0.0,
            "must not be negative",
            "Warning: Adjusted wall clearance changes every tray width",
        );

        let large_cable_threshold = load_f64_with_warning(
            Self::LARGE_CABLE_VAR,
            SolverConfig::DEFAULT_LARGE_CABLE_THRESHOLD,
            |value| value > 0.0,
            "must be greater than 0",
            "Warning: Adjusted large-cable threshold changes which cables may stack",
        );

        let simulation_ceiling = load_f64_with_warning(
            Self::CEILING_VAR,
            SolverConfig::DEFAULT_SIMULATION_CEILING,
            |value| value > 0.0,
            "must be greater than 0",
            "Warning: Adjusted simulation ceiling limits stack height",
        );

        let collision_epsilon = load_f64_with_warning(
            Self::COLLISION_VAR,
            SolverConfig::DEFAULT_COLLISION_EPSILON,
            |value| (0.0..=0.5).contains(&value),
            "must be between 0 and 0.5",
            "Warning: Adjusted collision tolerance may allow visible overlap",
        );

        let support_tolerance = load_f64_with_warning(
            Self::SUPPORT_VAR,
            SolverConfig::DEFAULT_SUPPORT_TOLERANCE,
            |value| value > 0.0,
            "must be greater than 0",
            "Warning: Adjusted support tolerance may accept floating cables",
        );

        let max_width = load_f64_with_warning(
            Self::MAX_WIDTH_VAR,
            SolverConfig::DEFAULT_MAX_WIDTH,
            |value| value >= SolverConfig::DEFAULT_MIN_WIDTH,
            "must be at least the minimum width",
            "Warning: Adjusted maximum width changes the search range",
        );

        let angle_step = load_f64_with_warning(
            Self::ANGLE_STEP_VAR,
            SolverConfig::DEFAULT_ANGLE_STEP_DEGREES,
            |value| value > 0.0 && value < 90.0,
            "must be between 0 and 90 degrees",
            "Warning: Adjusted angle step changes placement density",
        );

        let solver = SolverConfig::builder()
            .margin_x(margin_x)
            .large_cable_threshold(large_cable_threshold)
            .simulation_ceiling(simulation_ceiling)
            .collision_epsilon(collision_epsilon)
            .support_tolerance(support_tolerance)
            .width_search(
                SolverConfig::DEFAULT_MIN_WIDTH,
                max_width,
                SolverConfig::DEFAULT_WIDTH_STEP,
            )
            .angle_step_degrees(angle_step)
            .build();

        Self { solver }
    }

    /// Returns the configured SolverConfig.
    pub fn solver_config(&self) -> SolverConfig {
        self.solver
    }
}

/// Values applied when a request omits the corresponding field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RequestDefaults {
    pub max_height_limit: f64,
    pub target_fill_ratio_percent: f64,
    pub include_matrix: bool,
}

impl RequestDefaults {
    pub const DEFAULT_HEIGHT: f64 = 60.0;
    pub const DEFAULT_FILL_RATIO: f64 = 60.0;
    pub const DEFAULT_INCLUDE_MATRIX: bool = false;

    const HEIGHT_VAR: &'static str = "TRAY_FILL_DEFAULT_HEIGHT";
    const FILL_RATIO_VAR: &'static str = "TRAY_FILL_DEFAULT_FILL_RATIO";
    const INCLUDE_MATRIX_VAR: &'static str = "TRAY_FILL_DEFAULT_INCLUDE_MATRIX";

    fn from_env() -> Self {
        let max_height_limit = load_f64_with_warning(
            Self::HEIGHT_VAR,
            Self::DEFAULT_HEIGHT,
            |value| value > 0.0,
            "must be greater than 0",
            "Notice: Default tray height changed",
        );

        let target_fill_ratio_percent = load_f64_with_warning(
            Self::FILL_RATIO_VAR,
            Self::DEFAULT_FILL_RATIO,
            |value| value > 0.0 && value <= 100.0,
            "must be within (0, 100]",
            "Notice: Default target fill ratio changed",
        );

        let include_matrix = env_string(Self::INCLUDE_MATRIX_VAR)
            .and_then(|raw| parse_bool(&raw, Self::INCLUDE_MATRIX_VAR))
            .unwrap_or(Self::DEFAULT_INCLUDE_MATRIX);

        Self {
            max_height_limit,
            target_fill_ratio_percent,
            include_matrix,
        }
    }
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            max_height_limit: Self::DEFAULT_HEIGHT,
            target_fill_ratio_percent: Self::DEFAULT_FILL_RATIO,
            include_matrix: Self::DEFAULT_INCLUDE_MATRIX,
        }
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            eprintln!(
                "⚠️ Access to {} failed: {}. Using default value.",
                name, err
            );
            None
        }
    }
}

fn parse_bool(raw: &str, var_name: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        other => {
            eprintln!(
                "⚠️ Could not interpret {} ('{}') as boolean value. Using default value.",
                var_name, other
            );
            None
        }
    }
}

fn load_f64_with_warning(
    var_name: &str,
    default: f64,
    validator: impl Fn(f64) -> bool,
    invalid_hint: &str,
    warning: &str,
) -> f64 {
    resolve_f64(var_name, env_string(var_name), default, validator, invalid_hint, warning)
}

fn resolve_f64(
    var_name: &str,
    raw: Option<String>,
    default: f64,
    validator: impl Fn(f64) -> bool,
    invalid_hint: &str,
    warning: &str,
) -> f64 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && validator(value) => {
            let tolerance = (default.abs().max(1.0)) * 1e-9;
            if (value - default).abs() > tolerance {
                println!("⚠️ {} ({} = {}).", warning, var_name, value);
            }
            value
        }
        Ok(_) => {
            eprintln!(
                "⚠️ {} contains invalid value '{}': {}. Using {}.",
                var_name, raw, invalid_hint, default
            );
            default
        }
        Err(err) => {
            eprintln!(
                "⚠️ Could not parse {} ('{}') as number: {}. Using {}.",
                var_name, raw, err, default
            );
            default
        }
    }
}
