#[cfg(test)]
mod params_tests {
    use shardcrypt_core::crypto::{
        parse_iv_hex, strip_line_ending, Chaining, CipherMode, CipherParams, CryptoError, KeyStrength, Operation,
    };
    use shardcrypt_core::types::{ErrorKind, StreamError};

    const IV_HEX: &str = "000102030405060708090a0b0c0d0e0f";

    #[test]
    fn key_text_is_cut_at_first_line_break() {
        assert_eq!(strip_line_ending("0123456789abcdef\n"), "0123456789abcdef");
        assert_eq!(strip_line_ending("abc\r\nrest"), "abc");
        assert_eq!(strip_line_ending("plain"), "plain");

        let params = CipherParams::from_text(CipherMode::Ecb, 128, "0123456789abcdef\n", None, Operation::Encrypt).unwrap();
        assert_eq!(params.key(), b"0123456789abcdef");
        assert_eq!(params.strength, KeyStrength::Aes128);
    }

    #[test]
    fn key_must_match_declared_strength() {
        let err = CipherParams::from_text(CipherMode::Ecb, 192, "0123456789abcdef", None, Operation::Encrypt).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKeyLength { expected: 24, actual: 16 }));

        let key = "k".repeat(32);
        assert!(CipherParams::from_text(CipherMode::Ecb, 256, &key, None, Operation::Decrypt).is_ok());
    }

    #[test]
    fn unsupported_key_bits() {
        let err = CipherParams::from_text(CipherMode::Ecb, 100, "0123456789abcdef", None, Operation::Encrypt).unwrap_err();
        assert!(matches!(err, CryptoError::UnsupportedCipherConfig(_)));
    }

    #[test]
    fn cbc_requires_an_iv() {
        let err = CipherParams::from_text(CipherMode::Cbc, 128, "0123456789abcdef", None, Operation::Encrypt).unwrap_err();
        assert!(matches!(err, CryptoError::MissingArgument("iv")));
        assert_eq!(StreamError::from(err).kind(), ErrorKind::MissingArgument);
    }

    #[test]
    fn ecb_drops_a_supplied_iv() {
        let params = CipherParams::from_text(CipherMode::Ecb, 128, "0123456789abcdef", Some("zz"), Operation::Encrypt).unwrap();
        assert!(params.iv().is_none());
    }

    #[test]
    fn iv_must_be_32_hex_chars() {
        assert_eq!(parse_iv_hex(IV_HEX).unwrap()[15], 0x0f);
        assert!(matches!(parse_iv_hex("0011"), Err(CryptoError::InvalidIvFormat(_))));
        assert!(matches!(
            parse_iv_hex("zz0102030405060708090a0b0c0d0e0f"),
            Err(CryptoError::InvalidIvFormat(_))
        ));

        let err = CipherParams::from_text(CipherMode::Cbc, 128, "0123456789abcdef", Some("abc"), Operation::Encrypt).unwrap_err();
        assert_eq!(StreamError::from(err).kind(), ErrorKind::InvalidIvFormat);
    }

    #[test]
    fn enums_parse_from_cli_text() {
        assert_eq!("CBC".parse::<CipherMode>().unwrap(), CipherMode::Cbc);
        assert_eq!("ecb".parse::<CipherMode>().unwrap(), CipherMode::Ecb);
        assert!("ctr".parse::<CipherMode>().is_err());
        assert_eq!("decrypt".parse::<Operation>().unwrap(), Operation::Decrypt);
        assert!("sign".parse::<Operation>().is_err());
        assert_eq!("standard".parse::<Chaining>().unwrap(), Chaining::Standard);
        assert_eq!("per-block".parse::<Chaining>().unwrap(), Chaining::PerBlock);
        assert_eq!(Chaining::default(), Chaining::PerBlock);
    }

    #[test]
    fn debug_output_hides_the_key() {
        let params = CipherParams::from_text(CipherMode::Cbc, 128, "supersecretkey!!", Some(IV_HEX), Operation::Encrypt).unwrap();
        let shown = format!("{params:?}");
        assert!(!shown.contains("supersecretkey"));
        assert!(shown.contains("has_iv: true"));
    }
}
