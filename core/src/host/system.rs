use std::sync::OnceLock;

use crate::enums::{operating_system as os_enum, Value};

/// The platform identifier of the running process: `linux`, `win32`,
/// `darwin`, or the raw target os name for anything else.
pub fn platform() -> &'static str {
    match std::env::consts::OS {
        "windows" => "win32",
        "macos" => "darwin",
        other => other,
    }
}

/// Classifies a platform identifier by case-sensitive prefix.
pub fn operating_system(platform: &str) -> Value {
    if platform.starts_with("linux") {
        os_enum::LINUX
    } else if platform.starts_with("win") {
        os_enum::WINDOWS
    } else if platform.starts_with("darwin") {
        os_enum::MAC
    } else {
        os_enum::OTHER
    }
}

pub fn current_operating_system() -> Value {
    operating_system(platform())
}

/// The classification of this process' platform, computed once.
pub fn os() -> &'static Value {
    static OS: OnceLock<Value> = OnceLock::new();
    OS.get_or_init(current_operating_system)
}

pub fn is_linux() -> bool {
    *os() == os_enum::LINUX
}

pub fn is_mac() -> bool {
    *os() == os_enum::MAC
}

pub fn is_windows() -> bool {
    *os() == os_enum::WINDOWS
}

pub fn is_posix() -> bool {
    is_linux() || is_mac()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_os() {
        assert_eq!(operating_system("linux"), os_enum::LINUX);
        assert_eq!(operating_system("linux2"), os_enum::LINUX);
        assert_eq!(operating_system("win"), os_enum::WINDOWS);
        assert_eq!(operating_system("win32"), os_enum::WINDOWS);
        assert_eq!(operating_system("darwin"), os_enum::MAC);
        assert_eq!(operating_system("FOO"), os_enum::OTHER);
        assert_eq!(operating_system("Linux"), os_enum::OTHER);
        assert_eq!(operating_system(""), os_enum::OTHER);
        assert_eq!(operating_system("linux"), "linux");
    }

    #[test]
    fn test_current() {
        assert_eq!(*os(), current_operating_system());
        assert_eq!(is_linux(), *os() == os_enum::LINUX);
        assert_eq!(is_mac(), *os() == os_enum::MAC);
        assert_eq!(is_windows(), *os() == os_enum::WINDOWS);
        assert_eq!(
            is_posix(),
            *os() == os_enum::LINUX || *os() == os_enum::MAC
        );
        assert_eq!(is_linux(), cfg!(target_os = "linux"));
        assert_eq!(is_windows(), cfg!(windows));
    }
}
