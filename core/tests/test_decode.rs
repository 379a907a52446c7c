#[cfg(test)]
mod tests {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use proptest::prelude::*;
    use serde_json::json;
    use agentcfg_core::catalog::RecordType;
    use agentcfg_core::record::{RecordBuilder, Wc2Config};
    use agentcfg_core::stream::{DecodeError, Entry, RecordStream};

    fn one(entry: &Entry) -> RecordStream {
        let mut s = RecordStream::new();
        s.load(std::slice::from_ref(entry)).unwrap();
        s
    }

    fn every_kind() -> Vec<Entry> {
        vec![
            Entry::Host("c2.example.com".into()),
            Entry::Sleep(90_000_000_000),
            Entry::Jitter(25),
            Entry::Ip(17),
            Entry::TlsVersion(3),
            Entry::TlsCa { version: 1, ca: b"ca-bytes".to_vec() },
            Entry::TlsCert { version: 2, pem: b"pem".to_vec(), key: b"key".to_vec() },
            Entry::Mtls { version: 3, ca: vec![1; 10], pem: vec![2; 20], key: vec![3; 5] },
            Entry::Wc2(
                Wc2Config::new()
                    .url("/news")
                    .host("cdn.example")
                    .agent("Mozilla/5.0")
                    .header("X", "1")
                    .header("Y", ""),
            ),
            Entry::Wc2(Wc2Config::new()),
            Entry::Xor(vec![0xAA, 0x55, 0x00]),
            Entry::Cbk { size: 64, keys: [1, 2, 3, 4] },
            Entry::Aes { key: vec![7; 32], iv: vec![9; 16] },
            Entry::Dns(vec!["a.example".into(), "b.example".into()]),
            Entry::Dns(vec![]),
            Entry::Base64Shift(13),
            Entry::Marker(RecordType::Tcp),
            Entry::Marker(RecordType::TlsInsecure),
            Entry::Marker(RecordType::Gzip),
            Entry::Marker(RecordType::Base64T),
        ]
    }

    #[test]
    fn test_every_kind_round_trips() {
        for entry in every_kind() {
            let s = one(&entry);
            assert_eq!(s.decode().unwrap(), vec![entry.clone()], "{}", entry.record_type());
        }
    }

    #[test]
    fn test_every_kind_round_trips_through_json() {
        for entry in every_kind() {
            let s = one(&entry);
            let text = serde_json::to_string(&s.to_json().unwrap()).unwrap();
            let back = RecordStream::from_json(&text).unwrap();
            assert_eq!(back.as_bytes(), s.as_bytes(), "{text}");
        }
    }

    #[test]
    fn test_structured_shapes() {
        let b = RecordBuilder::new();
        let mut s = RecordStream::new();
        s.append(&b.host("example.com").unwrap()).unwrap();
        s.append(&b.sleep_text("5s").unwrap()).unwrap();
        s.append(&b.jitter(20).unwrap()).unwrap();
        s.append(&b.marker(RecordType::Tcp).unwrap()).unwrap();
        s.append(&b.xor(Some(&b"\x01\x02\x03"[..])).unwrap()).unwrap();
        s.append(&b.cbk(16, [9, 8, 7, 6]).unwrap()).unwrap();
        s.append(&b.dns::<&str>(&[]).unwrap()).unwrap();

        assert_eq!(
            s.to_json().unwrap(),
            json!([
                {"type": "host", "args": "example.com"},
                {"type": "sleep", "args": "5s"},
                {"type": "jitter", "args": 20},
                {"type": "tcp"},
                {"type": "xor", "args": "AQID"},
                {"type": "cbk", "args": {"size": 16, "A": 9, "B": 8, "C": 7, "D": 6}},
                {"type": "dns"},
            ])
        );
    }

    #[test]
    fn test_wc2_headers_keep_order_and_empty_values() {
        let cfg = Wc2Config::new().header("X", "1").header("Y", "");
        let s = one(&Entry::Wc2(cfg));
        let text = serde_json::to_string(&s.to_json().unwrap()).unwrap();
        assert_eq!(text, r#"[{"type":"wc2","args":{"headers":{"X":"1","Y":""}}}]"#);

        match &s.decode().unwrap()[0] {
            Entry::Wc2(back) => {
                let pairs: Vec<(&str, &str)> =
                    back.headers.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
                assert_eq!(pairs, vec![("X", "1"), ("Y", "")]);
                assert_eq!(back.url, None);
            }
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn test_wc2_omits_empty_fields() {
        let s = one(&Entry::Wc2(Wc2Config::new().host("cdn")));
        assert_eq!(
            s.to_json().unwrap(),
            json!([{"type": "wc2", "args": {"host": "cdn"}}])
        );
    }

    #[test]
    fn test_mtls_field_lengths() {
        let b = RecordBuilder::new();
        let mut s = RecordStream::new();
        s.append(&b.mtls(1, &[b'A'; 10], &[b'B'; 20], &[b'C'; 5]).unwrap()).unwrap();
        let v = s.to_json().unwrap();
        let args = &v[0]["args"];
        let len = |f: &str| STANDARD.decode(args[f].as_str().unwrap()).unwrap().len();
        assert_eq!((len("ca"), len("pem"), len("key")), (10, 20, 5));
        assert_eq!(args["version"], json!(1));
    }

    #[test]
    fn test_tls_cert_field_lengths() {
        let b = RecordBuilder::new();
        let mut s = RecordStream::new();
        s.append(&b.tls_cert(1, &[b'B'; 20], &[b'C'; 5]).unwrap()).unwrap();
        let v = s.to_json().unwrap();
        assert_eq!(v[0]["type"], json!("tls-cert"));
        let args = &v[0]["args"];
        let len = |f: &str| STANDARD.decode(args[f].as_str().unwrap()).unwrap().len();
        assert_eq!((len("pem"), len("key")), (20, 5));
    }

    #[test]
    fn test_aes_degenerate_key_or_iv() {
        let mut bytes = vec![0xD6, 0, 16];
        bytes.extend_from_slice(&[0; 16]);
        let s = RecordStream::from_bytes(&bytes);
        assert_eq!(s.decode(), Err(DecodeError::InvalidKeyIv { offset: 0 }));

        let mut bytes = vec![0xC0, 0xD6, 16, 0];
        bytes.extend_from_slice(&[0; 16]);
        let s = RecordStream::from_bytes(&bytes);
        assert_eq!(s.decode(), Err(DecodeError::InvalidKeyIv { offset: 1 }));
    }

    #[test]
    fn test_wc2_zero_width_header_name() {
        let s = RecordStream::from_bytes(&[0xB1, 0, 0, 0, 0, 0, 0, 1, 0, 1, b'v']);
        assert_eq!(s.decode(), Err(DecodeError::InvalidHeader { offset: 0 }));
    }

    #[test]
    fn test_mandatory_tls_fields() {
        let s = RecordStream::from_bytes(&[0xB5, 1, 0, 0, 0, 1, b'k']);
        assert_eq!(
            s.decode(),
            Err(DecodeError::EmptyField { offset: 0, kind: RecordType::TlsCert, field: "pem" })
        );

        let s = RecordStream::from_bytes(&[0xB3, 1, 0, 0, 0, 1, 0, 1, b'p', b'k']);
        assert_eq!(
            s.decode(),
            Err(DecodeError::EmptyField { offset: 0, kind: RecordType::Mtls, field: "ca" })
        );

        let s = RecordStream::from_bytes(&[0xB4, 1, 0, 0]);
        assert_eq!(
            s.decode(),
            Err(DecodeError::EmptyField { offset: 0, kind: RecordType::TlsCa, field: "ca" })
        );
    }

    #[test]
    fn test_invalid_text() {
        let s = RecordStream::from_bytes(&[0xA0, 0, 1, 0xFF]);
        assert_eq!(
            s.decode(),
            Err(DecodeError::InvalidUtf8 { offset: 0, kind: RecordType::Host, field: "name" })
        );
    }

    #[test]
    fn test_decode_stops_at_unknown_type() {
        let s = RecordStream::from_bytes(&[0xC0, 0x7F]);
        assert_eq!(s.decode(), Err(DecodeError::UnknownType { offset: 1, id: 0x7F }));
    }

    #[test]
    fn test_entry_serde() {
        let e = Entry::Sleep(1_500_000_000);
        assert_eq!(serde_json::to_value(&e).unwrap(), json!({"type": "sleep", "args": "1.5s"}));
        let back: Entry = serde_json::from_value(json!({"type": "SLEEP", "args": "1.5s"})).unwrap();
        assert_eq!(back, e);
    }

    proptest! {
        #[test]
        fn prop_xor_key_round_trips(key in proptest::collection::vec(any::<u8>(), 1..512)) {
            let e = Entry::Xor(key);
            let s = one(&e);
            prop_assert_eq!(s.decode().unwrap(), vec![e]);
        }

        #[test]
        fn prop_sleep_round_trips(ns in 1i64..=i64::MAX) {
            let e = Entry::Sleep(ns);
            let s = one(&e);
            prop_assert_eq!(s.decode().unwrap(), vec![e]);
        }
    }
}
