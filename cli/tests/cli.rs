#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::process::{Command, Output};

    use tempfile::tempdir;

    const KEY128: &str = "0123456789abcdef";
    const IV: &str = "000102030405060708090a0b0c0d0e0f";

    fn shardcrypt(args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_shardcrypt"))
            .args(args)
            .env_remove("RUST_LOG")
            .output()
            .expect("spawn shardcrypt")
    }

    fn path_str(p: &Path) -> &str {
        p.to_str().expect("utf-8 temp path")
    }

    #[test]
    fn cbc_round_trip_through_binary() {
        let dir = tempdir().unwrap();
        let plain = dir.path().join("data.bin");
        let original: Vec<u8> = (0..1000u32).map(|i| (i * 7 % 251) as u8).collect();
        fs::write(&plain, &original).unwrap();

        let enc = shardcrypt(&[
            "--file", path_str(&plain),
            "--operation", "encrypt",
            "--mode", "cbc",
            "--key", KEY128,
            "--iv", IV,
            "--workers", "3",
            "--threads", "2",
        ]);
        assert!(enc.status.success(), "stderr: {}", String::from_utf8_lossy(&enc.stderr));

        let cipher_path = dir.path().join("data.bin.out");
        let stdout = String::from_utf8_lossy(&enc.stdout);
        assert!(stdout.contains("Operation 'encrypt' completed, output file:"));
        assert!(stdout.contains("data.bin.out"));
        assert_eq!(fs::metadata(&cipher_path).unwrap().len(), 1008);

        fs::remove_file(&plain).unwrap();
        let dec = shardcrypt(&[
            "--file", path_str(&cipher_path),
            "--operation", "decrypt",
            "--mode", "cbc",
            "--key", KEY128,
            "--iv", IV,
            "--workers", "2",
        ]);
        assert!(dec.status.success(), "stderr: {}", String::from_utf8_lossy(&dec.stderr));
        assert_eq!(fs::read(&plain).unwrap(), original);
    }

    #[test]
    fn missing_iv_in_cbc_exits_with_one() {
        let dir = tempdir().unwrap();
        let plain = dir.path().join("x.txt");
        fs::write(&plain, b"hello").unwrap();

        let out = shardcrypt(&[
            "--file", path_str(&plain),
            "--operation", "encrypt",
            "--mode", "cbc",
            "--key", KEY128,
        ]);
        assert_eq!(out.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&out.stderr).contains("iv"));
        assert!(!dir.path().join("x.txt.out").exists());
    }

    #[test]
    fn missing_file_argument_exits_with_one() {
        let out = shardcrypt(&["--operation", "encrypt", "--mode", "ecb", "--key", KEY128]);
        assert_eq!(out.status.code(), Some(1));
    }

    #[test]
    fn unreadable_file_exits_with_one() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.bin");
        let out = shardcrypt(&[
            "--file", path_str(&missing),
            "--operation", "encrypt",
            "--mode", "ecb",
            "--key", KEY128,
        ]);
        assert_eq!(out.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&out.stderr).contains("cannot open file"));
    }

    #[test]
    fn wrong_key_length_exits_with_one() {
        let dir = tempdir().unwrap();
        let plain = dir.path().join("k.bin");
        fs::write(&plain, b"abc").unwrap();

        let out = shardcrypt(&[
            "--file", path_str(&plain),
            "--operation", "encrypt",
            "--mode", "ecb",
            "--key", KEY128,
            "--keylen", "256",
        ]);
        assert_eq!(out.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&out.stderr).contains("invalid key length"));
    }

    #[test]
    fn misaligned_ciphertext_leaves_no_output() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.bin.out");
        fs::write(&bad, vec![0u8; 17]).unwrap();

        let out = shardcrypt(&[
            "--file", path_str(&bad),
            "--operation", "decrypt",
            "--mode", "ecb",
            "--key", KEY128,
            "--workers", "4",
        ]);
        assert_eq!(out.status.code(), Some(1));
        assert!(!dir.path().join("bad.bin").exists());
    }

    #[test]
    fn stats_flag_prints_json() {
        let dir = tempdir().unwrap();
        let plain = dir.path().join("s.bin");
        fs::write(&plain, vec![9u8; 64]).unwrap();

        let out = shardcrypt(&[
            "--file", path_str(&plain),
            "--operation", "encrypt",
            "--mode", "ecb",
            "--key", KEY128,
            "--workers", "2",
            "--threads", "1",
            "--stats",
        ]);
        assert!(out.status.success());
        let stdout = String::from_utf8_lossy(&out.stdout);
        assert!(stdout.contains("\"blocks_processed\": 5"));
    }
}
