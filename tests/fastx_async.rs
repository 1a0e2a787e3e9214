#[cfg(feature = "async")]
mod t {
    use kseq_compat_reader::{AsyncSeqReader, ErrorPolicy, ParseError, ReaderOptions};
    use tempfile::tempdir;
    use tokio::fs::File;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn async_parse_plain() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.fastq");
        {
            let mut f = File::create(&path).await.unwrap();
            f.write_all(b"@id desc\nAC\nGT\n+\n!!\n!!\n>fa\nTT\n").await.unwrap();
            f.flush().await.unwrap();
        }
        let mut fq = AsyncSeqReader::from_path(&path, ReaderOptions::default())
            .await
            .unwrap();

        let rec = fq.next_record().await.unwrap().unwrap();
        assert_eq!(rec.name, b"id");
        assert_eq!(rec.comment.as_deref(), Some(&b"desc"[..]));
        assert_eq!(rec.seq, b"ACGT");
        assert_eq!(rec.qual.as_deref(), Some(&b"!!!!"[..]));

        let rec = fq.next_record().await.unwrap().unwrap();
        assert_eq!(rec.name, b"fa");
        assert_eq!(rec.qual, None);
        assert!(fq.next_record().await.is_none());
    }

    #[tokio::test]
    async fn async_parse_gz() {
        use std::io::Write;
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.fq.gz");
        {
            let f = std::fs::File::create(&path).unwrap();
            let mut enc = flate2::write::GzEncoder::new(f, flate2::Compression::fast());
            enc.write_all(b"@x\nACGT\n+\nIIII\n").unwrap();
            enc.finish().unwrap();
        }
        let mut fq = AsyncSeqReader::from_path(&path, ReaderOptions::default())
            .await
            .unwrap();
        let rec = fq.read_record().await.unwrap().unwrap();
        assert_eq!(rec.seq, b"ACGT");
        assert!(fq.read_record().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn async_truncation_and_skip() {
        let input: &[u8] = b"@cut\nACGT\n+\n!";
        let mut fq = AsyncSeqReader::new(input);
        let err = fq.read_record().await.unwrap_err();
        assert_eq!(
            err.parse_error(),
            Some(&ParseError::TruncatedQuality { seq: 4, qual: 1 })
        );

        let input: &[u8] = b"@bad\nAC\n+\n!!!\n@ok\nA\n+\n#\n";
        let mut fq = AsyncSeqReader::with_options(
            input,
            ReaderOptions {
                error_policy: ErrorPolicy::Skip,
                buffer_capacity: 4,
                ..ReaderOptions::default()
            },
        );
        let rec = fq.next_record().await.unwrap().unwrap();
        assert_eq!(rec.name, b"ok");
        assert!(fq.next_record().await.is_none());
        assert_eq!(fq.records_read(), 2);
    }
}
