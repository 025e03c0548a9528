use uuid::Uuid;

/// 生成活动服务器种子 (32 位十六进制, 每个活动一个, 跨活动不复用)
/// 种子在活动创建时生成并随 actor 快照持久化, 完赛时才发布到活动行
pub fn generate_server_seed() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_format() {
        let seed = generate_server_seed();
        assert_eq!(seed.len(), 32);
        assert!(seed.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_seeds_are_unique() {
        let a = generate_server_seed();
        let b = generate_server_seed();
        assert_ne!(a, b);
    }
}
