use kseq_compat_reader::{SeqReader, SeqRecord};
use std::io::{Cursor, Seek, SeekFrom};

const INPUT: &[u8] = b">r1\nACGT\n@q1\nAC\nGT\n+\n!!\n!!\n>r2\nTTTT\n";

fn drain<R: std::io::Read>(rdr: &mut SeqReader<R>) -> Vec<SeqRecord> {
    let mut out = Vec::new();
    while let Some(rec) = rdr.read_record().unwrap() {
        out.push(rec);
    }
    out
}

#[test]
fn rewind_to_start_replays_records() {
    let mut rdr = SeqReader::new(Cursor::new(INPUT));
    let first = drain(&mut rdr);
    assert_eq!(first.len(), 3);
    assert_eq!(rdr.records_read(), 3);

    rdr.rewind_to_start().unwrap();
    assert_eq!(rdr.records_read(), 0);
    let second = drain(&mut rdr);
    assert_eq!(first, second);
}

#[test]
fn rewind_mid_stream_after_manual_seek() {
    let mut rdr = SeqReader::new(Cursor::new(INPUT));
    let head = rdr.read_record().unwrap().unwrap();
    assert_eq!(head.name, b"r1");

    rdr.get_mut().seek(SeekFrom::Start(0)).unwrap();
    rdr.rewind();
    let all = drain(&mut rdr);
    assert_eq!(all.len(), 3);
    assert_eq!(all[0], head);
    assert_eq!(all[1].qual.as_deref(), Some(&b"!!!!"[..]));
}

#[test]
fn into_inner_returns_source() {
    let rdr = SeqReader::new(Cursor::new(INPUT));
    let cur = rdr.into_inner();
    assert_eq!(cur.position(), 0);
}
