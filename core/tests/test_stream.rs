#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use agentcfg_core::catalog::{RecordType, Slots};
    use agentcfg_core::record::{Record, RecordBuilder, Wc2Config};
    use agentcfg_core::stream::{DecodeError, RecordStream, StreamError};

    fn b() -> RecordBuilder {
        RecordBuilder::new()
    }

    fn sample_stream() -> RecordStream {
        let b = b();
        let mut s = RecordStream::new();
        s.append(&b.host("example.com").unwrap()).unwrap();
        s.append(&b.sleep_text("30s").unwrap()).unwrap();
        s.append(&b.jitter(10).unwrap()).unwrap();
        s.append(&b.mtls(1, b"ca", b"pem", b"key").unwrap()).unwrap();
        s.append(&b.marker(RecordType::Zlib).unwrap()).unwrap();
        s.append(&b.xor(Some(&b"xorkey"[..])).unwrap()).unwrap();
        s.append(&b.cbk(32, [1, 2, 3, 4]).unwrap()).unwrap();
        s.append(&b.aes(None, None).unwrap()).unwrap();
        s.append(&b.dns(&["a.example", "b.example"]).unwrap()).unwrap();
        s
    }

    #[test]
    fn test_duplicate_connector_leaves_stream_unchanged() {
        let mut s = RecordStream::new();
        s.append(&b().marker(RecordType::Tcp).unwrap()).unwrap();
        let before = s.as_bytes().to_vec();

        let err = s.append(&b().marker(RecordType::Udp).unwrap()).unwrap_err();
        assert_eq!(err, StreamError::DuplicateConnector { kind: RecordType::Udp });
        assert_eq!(s.as_bytes(), before.as_slice());
    }

    #[test]
    fn test_custom_connector_shares_connector_slot() {
        let mut s = RecordStream::new();
        s.append(&b().wc2(&Wc2Config::new().host("cdn")).unwrap()).unwrap();
        assert_eq!(
            s.append(&b().marker(RecordType::Tls).unwrap()),
            Err(StreamError::DuplicateConnector { kind: RecordType::Tls })
        );
        assert_eq!(
            s.append(&b().ip(6).unwrap()),
            Err(StreamError::DuplicateConnector { kind: RecordType::Ip })
        );
    }

    #[test]
    fn test_single_transform() {
        let mut s = RecordStream::new();
        s.append(&b().marker(RecordType::Base64T).unwrap()).unwrap();
        assert_eq!(
            s.append(&b().dns::<&str>(&[]).unwrap()),
            Err(StreamError::DuplicateTransform { kind: RecordType::Dns })
        );
        assert_eq!(s.slots(), Slots::TRANSFORM);
    }

    #[test]
    fn test_wrappers_and_system_records_unlimited() {
        let mut s = RecordStream::new();
        for _ in 0..3 {
            s.append(&b().marker(RecordType::Hex).unwrap()).unwrap();
            s.append(&b().xor(Some(&b"k"[..])).unwrap()).unwrap();
            s.append(&b().host("h").unwrap()).unwrap();
        }
        assert_eq!(s.records().count(), 9);
        assert!(s.slots().is_empty());
    }

    #[test]
    fn test_append_rejects_bad_records() {
        let mut s = RecordStream::new();
        assert_eq!(s.append(&Record::new(0, vec![])), Err(StreamError::InvalidRecord));
        assert_eq!(s.append(&Record::new(0x99, vec![1])), Err(StreamError::UnknownType { id: 0x99 }));
        assert_eq!(
            s.append(&Record::new(0xA0, vec![0x00, 0x05, b'a'])),
            Err(StreamError::MalformedRecord { kind: RecordType::Host, have: 4, need: 8 })
        );
        assert_eq!(
            s.append(&Record::new(0xA2, vec![1, 2])),
            Err(StreamError::MalformedRecord { kind: RecordType::Jitter, have: 3, need: 2 })
        );
        assert!(s.is_empty());
        assert_eq!(s.counters().rejected, 4);
    }

    #[test]
    fn test_marker_drops_stray_payload() {
        let mut s = RecordStream::new();
        s.append(&Record::new(0xC0, vec![1, 2, 3])).unwrap();
        assert_eq!(s.as_bytes(), &[0xC0]);
    }

    #[test]
    fn test_next_offset_walks_every_record() {
        let s = sample_stream();
        let mut offsets = vec![0];
        let mut at = 0;
        while let Some(next) = s.next_offset(at).unwrap() {
            offsets.push(next);
            at = next;
        }
        assert_eq!(*offsets.last().unwrap(), s.len());
        assert_eq!(offsets.len() - 1, 9);
        assert_eq!(&offsets[..3], &[0, 14, 23]);
    }

    #[test]
    fn test_next_offset_at_or_past_end() {
        let s = sample_stream();
        assert_eq!(s.next_offset(s.len()).unwrap(), None);
        assert_eq!(s.next_offset(s.len() + 10).unwrap(), None);
        assert_eq!(RecordStream::new().next_offset(0).unwrap(), None);
    }

    #[test]
    fn test_next_offset_errors() {
        let s = RecordStream::from_bytes(&[0xC0, 0x00]);
        assert_eq!(s.next_offset(0).unwrap(), Some(1));
        assert_eq!(s.next_offset(1), Err(DecodeError::UnknownType { offset: 1, id: 0 }));

        let s = RecordStream::from_bytes(&[0xA1, 0, 0]);
        assert_eq!(s.next_offset(0), Err(DecodeError::Truncated { offset: 0, need: 9, have: 3 }));

        let s = RecordStream::from_bytes(&[0xB3, 1, 0x00, 0x02, 0x00, 0x01, 0x00, 0x01, b'c', b'a', b'p']);
        assert!(matches!(s.next_offset(0), Err(DecodeError::Truncated { offset: 0, need: 12, .. })));
    }

    #[test]
    fn test_records_iterator() {
        let s = sample_stream();
        let kinds: Vec<RecordType> = s.records().map(|v| v.unwrap().kind()).collect();
        assert_eq!(
            kinds,
            vec![
                RecordType::Host,
                RecordType::Sleep,
                RecordType::Jitter,
                RecordType::Mtls,
                RecordType::Zlib,
                RecordType::Xor,
                RecordType::Cbk,
                RecordType::Aes,
                RecordType::Dns,
            ]
        );

        let mut bytes = s.as_bytes().to_vec();
        bytes.push(0x01);
        let broken = RecordStream::from_bytes(&bytes);
        let results: Vec<_> = broken.records().collect();
        assert_eq!(results.len(), 10);
        assert!(results[9].is_err());
    }

    #[test]
    fn test_ingest_is_verbatim_and_marks_slots() {
        let src = sample_stream();
        let mut s = RecordStream::new();
        s.ingest(src.as_bytes());
        assert_eq!(s.as_bytes(), src.as_bytes());
        assert_eq!(s.slots(), Slots::CONNECTOR | Slots::TRANSFORM);
        assert_eq!(
            s.append(&b().marker(RecordType::Tcp).unwrap()),
            Err(StreamError::DuplicateConnector { kind: RecordType::Tcp })
        );
    }

    #[test]
    fn test_ingest_stops_marking_at_bad_record() {
        let mut s = RecordStream::new();
        s.ingest(&[0xD0, 0x00, 0xC0]);
        assert_eq!(s.len(), 3);
        assert!(s.slots().is_empty());
        s.append(&b().marker(RecordType::Tcp).unwrap()).unwrap();
        assert_eq!(s.as_bytes(), &[0xD0, 0x00, 0xC0, 0xC0]);
    }

    #[test]
    fn test_base64_round_trip() {
        let s = sample_stream();
        let back = RecordStream::from_base64(&s.to_base64()).unwrap();
        assert_eq!(back.as_bytes(), s.as_bytes());
    }

    #[test]
    fn test_counters() {
        let mut s = RecordStream::new();
        s.append(&b().host("example.com").unwrap()).unwrap();
        s.append(&b().marker(RecordType::Tcp).unwrap()).unwrap();
        let _ = s.append(&b().marker(RecordType::Udp).unwrap());
        s.ingest(&[0xD0]);

        let c = s.counters();
        assert_eq!(c.records_appended, 2);
        assert_eq!(c.markers_appended, 1);
        assert_eq!(c.bytes_appended, 15);
        assert_eq!(c.bytes_ingested, 1);
        assert_eq!(c.rejected, 1);
        assert_eq!(c.total_bytes(), s.len() as u64);
    }

    proptest! {
        #[test]
        fn prop_walk_ends_exactly_at_len(
            hosts in proptest::collection::vec("[a-z]{1,40}", 0..8),
            keys in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 1..100), 0..8),
        ) {
            let b = RecordBuilder::new();
            let mut s = RecordStream::new();
            for h in &hosts {
                s.append(&b.host(h).unwrap()).unwrap();
            }
            for k in &keys {
                s.append(&b.xor(Some(k.as_slice())).unwrap()).unwrap();
            }
            let mut at = 0;
            let mut count = 0;
            while let Some(next) = s.next_offset(at).unwrap() {
                prop_assert!(next > at);
                at = next;
                count += 1;
            }
            prop_assert_eq!(at, s.len());
            prop_assert_eq!(count, hosts.len() + keys.len());
        }

        #[test]
        fn prop_walking_arbitrary_bytes_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let s = RecordStream::from_bytes(&bytes);
            for r in s.records() {
                if r.is_err() {
                    break;
                }
            }
            let _ = s.decode();
        }
    }
}
