//! Dual-valued enums: every member carries an integer for database columns
//! and a string for display and APIs.

mod cast;
mod error;
mod registry;
mod value;

pub use cast::{cast_enum, CastEnum, CastType, Scalar};
pub use error::EnumError;
pub use registry::{Enum, Lookup};
pub use value::{Operand, Uniqueness, Value};

/// Declares a module holding a process-wide dual-valued enum.
///
/// The generated module exposes one [`Value`] constant per member plus:
/// - `registry()`: the [`Enum`] built from the members;
/// - `strings()`: its string [`CastEnum`], for APIs;
/// - `db()`: its integer [`CastEnum`], for database columns.
///
/// # Examples
/// ```
/// farm_core::farm_enum! {
///     pub mod job_state = "JobState" {
///         PAUSED = (100, "paused"),
///         QUEUED = (101, "queued"),
///     }
/// }
///
/// assert_eq!(job_state::PAUSED, "paused");
/// assert_eq!(job_state::db()["QUEUED"], 101);
/// ```
#[macro_export]
macro_rules! farm_enum {
    (
        $(#[$meta:meta])*
        $vis:vis mod $module:ident = $name:literal {
            $($member:ident = ($int:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis mod $module {
            use std::sync::OnceLock;

            use $crate::enums::{CastEnum, CastType, Enum, Value};

            pub const NAME: &str = $name;

            $(pub const $member: Value = Value::from_static($int, $label);)+

            pub fn registry() -> &'static Enum {
                static REGISTRY: OnceLock<Enum> = OnceLock::new();
                REGISTRY.get_or_init(|| {
                    Enum::new(NAME, [$((stringify!($member), $member)),+])
                        .expect(concat!("conflicting members in ", $name))
                })
            }

            pub fn strings() -> &'static CastEnum {
                static STRINGS: OnceLock<CastEnum> = OnceLock::new();
                STRINGS.get_or_init(|| registry().cast(CastType::Str))
            }

            pub fn db() -> &'static CastEnum {
                static DB: OnceLock<CastEnum> = OnceLock::new();
                DB.get_or_init(|| registry().cast(CastType::Int))
            }
        }
    };
}

farm_enum! {
    /// Lifecycle of a job or task.
    pub mod work_state = "WorkState" {
        PAUSED = (100, "paused"),
        QUEUED = (101, "queued"),
        BLOCKED = (102, "blocked"),
        ALLOC = (103, "alloc"),
        ASSIGN = (104, "assign"),
        RUNNING = (105, "running"),
        DONE = (106, "done"),
        FAILED = (107, "failed"),
        JOBTYPE_FAILED_IMPORT = (108, "jobtype_failed_import"),
        JOBTYPE_INVALID_CLASS = (109, "jobtype_invalid_class"),
        NO_SUCH_COMMAND = (110, "no_such_command"),
    }
}

farm_enum! {
    /// Availability of an agent.
    pub mod agent_state = "AgentState" {
        DISABLED = (200, "disabled"),
        OFFLINE = (201, "offline"),
        ONLINE = (202, "online"),
        RUNNING = (203, "running"),
    }
}

farm_enum! {
    pub mod operating_system = "OperatingSystem" {
        LINUX = (300, "linux"),
        WINDOWS = (301, "windows"),
        MAC = (302, "mac"),
        OTHER = (303, "other"),
    }
}

farm_enum! {
    /// How the master should address an agent.
    pub mod use_agent_address = "UseAgentAddress" {
        LOCAL = (310, "local"),
        REMOTE = (311, "remote"),
        HOSTNAME = (312, "hostname"),
        PASSIVE = (313, "passive"),
    }
}

/// Every farm registry, in declaration order.
pub fn registries() -> [&'static Enum; 4] {
    [
        work_state::registry(),
        agent_state::registry(),
        operating_system::registry(),
        use_agent_address::registry(),
    ]
}
