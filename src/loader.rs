//! Binary program file I/O: reads the fixed-layout file format into a
//! `Machine`, and writes a `dump.bin` reflecting current machine state for
//! the round-trip property.
//!
//! Format (little-endian `u32` throughout): header `textsize, datasize,
//! dataend`, then `textsize` text words, then `datasize` data words. The
//! original (`examples/original_source/machine.c`'s `read_program`/
//! `dump_memory`) uses the host's native byte order with no explicit
//! endianness; this crate uses `byteorder::LittleEndian` explicitly so the
//! wire format is unambiguous across hosts.

use crate::machine::Machine;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Write};
use std::path::Path;

/// Reads a program file and builds a `Machine` from it (`Machine::load`
/// handles the `MINSTACKSIZE` padding).
pub fn read_program(path: &Path) -> io::Result<Machine> {
    let mut reader = io::BufReader::new(std::fs::File::open(path)?);

    let textsize = reader.read_u32::<LittleEndian>()?;
    let datasize = reader.read_u32::<LittleEndian>()?;
    let dataend = reader.read_u32::<LittleEndian>()?;

    let mut text = Vec::with_capacity(textsize as usize);
    for _ in 0..textsize {
        text.push(reader.read_u32::<LittleEndian>()?);
    }

    let mut data = Vec::with_capacity(datasize as usize);
    for _ in 0..datasize {
        data.push(reader.read_u32::<LittleEndian>()?);
    }

    Ok(Machine::load(text, data, dataend))
}

/// Writes `machine`'s current text/data segments to `path` in the same
/// layout `read_program` reads, for the dump/round-trip property.
pub fn dump_program(machine: &Machine, path: &Path) -> io::Result<()> {
    let mut writer = io::BufWriter::new(std::fs::File::create(path)?);

    writer.write_u32::<LittleEndian>(machine.textsize())?;
    writer.write_u32::<LittleEndian>(machine.datasize())?;
    writer.write_u32::<LittleEndian>(machine.dataend)?;

    for word in &machine.text {
        writer.write_u32::<LittleEndian>(*word)?;
    }
    for word in &machine.data {
        writer.write_u32::<LittleEndian>(*word)?;
    }

    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_program_file(path: &Path, text: &[u32], data: &[u32], dataend: u32) {
        let mut file = std::fs::File::create(path).unwrap();
        file.write_u32::<LittleEndian>(text.len() as u32).unwrap();
        file.write_u32::<LittleEndian>(data.len() as u32).unwrap();
        file.write_u32::<LittleEndian>(dataend).unwrap();
        for word in text {
            file.write_u32::<LittleEndian>(*word).unwrap();
        }
        for word in data {
            file.write_u32::<LittleEndian>(*word).unwrap();
        }
    }

    #[test]
    fn round_trip_through_dump_preserves_text_and_data() {
        let dir = std::env::temp_dir();
        let input_path = dir.join(format!("packvm-loader-test-{}.bin", std::process::id()));
        let dump_path = dir.join(format!("packvm-loader-dump-{}.bin", std::process::id()));

        let text = vec![0x04000000u32, 11 << 26];
        let data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];
        write_program_file(&input_path, &text, &data, 16);

        let machine = read_program(&input_path).unwrap();
        assert_eq!(machine.data, data);
        dump_program(&machine, &dump_path).unwrap();

        let dumped = read_program(&dump_path).unwrap();
        assert_eq!(dumped.text, machine.text);
        assert_eq!(dumped.data, machine.data);
        assert_eq!(dumped.dataend, machine.dataend);

        let _ = std::fs::remove_file(&input_path);
        let _ = std::fs::remove_file(&dump_path);
    }
}
