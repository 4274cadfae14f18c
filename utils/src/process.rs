use std::sync::OnceLock;

pub fn get_self_pid() -> u32 {
    static PID: OnceLock<u32> = OnceLock::new();
    *PID.get_or_init(std::process::id)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_self_pid() {
        assert_eq!(get_self_pid(), std::process::id());
    }
}
