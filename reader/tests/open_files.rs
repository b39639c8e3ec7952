use std::fs;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use resource_reader::{
    Error, NcsFile, OpCode, Operand, ReaderConfig, ResourceProvider, ResourceType, RimFile,
};

fn create_script() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&[0x04, 0x03]);
    body.write_i32::<BigEndian>(42).unwrap();
    body.extend_from_slice(&[0x1d, 0x00]);
    body.write_i32::<BigEndian>(6).unwrap();
    body.extend_from_slice(&[0x20, 0x00]);

    let mut data = Vec::new();
    data.extend_from_slice(b"NCS V1.0");
    data.write_u8(0x42).unwrap();
    data.write_u32::<BigEndian>(13 + body.len() as u32).unwrap();
    data.extend_from_slice(&body);
    data
}

/// Directory placed after the payloads, the way shipped archives are laid out
fn create_archive(entries: &[(&str, ResourceType, Vec<u8>)]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"RIM V1.0");
    data.write_u32::<LittleEndian>(0).unwrap();
    data.write_u32::<LittleEndian>(entries.len() as u32).unwrap();
    data.write_u32::<LittleEndian>(0).unwrap(); // Patched below

    let mut placed = Vec::new();
    for (_, _, payload) in entries {
        placed.push((data.len() as u32, payload.len() as u32));
        data.extend_from_slice(payload);
    }

    let directory_offset = data.len() as u32;
    data[16..20].copy_from_slice(&directory_offset.to_le_bytes());
    for ((name, ty, _), (offset, size)) in entries.iter().zip(placed) {
        let mut field = [0u8; 16];
        field[..name.len()].copy_from_slice(name.as_bytes());
        data.extend_from_slice(&field);
        data.write_u16::<LittleEndian>(ty.code()).unwrap();
        data.extend_from_slice(&[0; 6]);
        data.write_u32::<LittleEndian>(offset).unwrap();
        data.write_u32::<LittleEndian>(size).unwrap();
    }
    data
}

#[test]
fn open_archive_from_disk_and_decode_script() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("m01aa.rim");
    let bytes = create_archive(&[
        ("m01aa", ResourceType::Ifo, b"IFO V3.2".to_vec()),
        ("K_Open_Door", ResourceType::Ncs, create_script()),
        ("k_open_door", ResourceType::Nss, b"void main() {}".to_vec()),
    ]);
    fs::write(&path, &bytes).unwrap();

    let rim = RimFile::open(path.as_path()).unwrap();
    assert_eq!(rim.resource_count(), 3);
    assert_eq!(rim.len(), bytes.len());
    assert_eq!(rim.resources_offset() as usize, bytes.len() - 3 * 32);

    let source = rim
        .find("k_open_door", ResourceType::Nss)
        .unwrap()
        .unwrap();
    assert_eq!(source, b"void main() {}");

    let script = rim
        .find("K_OPEN_DOOR", ResourceType::Ncs)
        .unwrap()
        .unwrap();
    let program = NcsFile::decode("k_open_door", script, &ReaderConfig::default()).unwrap();
    assert_eq!(program.len(), 3);
    assert_eq!(program.instructions()[0].operands, vec![Operand::Int(42)]);
    assert_eq!(program.instructions()[1].opcode, OpCode::Jmp);
    assert_eq!(program.instructions()[1].jump_target(), Some(0x19));
    assert_eq!(program.instruction_at(0x19).unwrap().opcode, OpCode::Retn);
}

#[test]
fn open_script_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("k_open_door.ncs");
    fs::write(&path, create_script()).unwrap();

    let ncs = NcsFile::open("k_open_door", path).unwrap();
    assert_eq!(ncs.program().len(), 3);
    assert_eq!(ncs.program().length(), 0x1b);
}

#[test]
fn every_payload_matches_source_bytes() {
    let bytes = create_archive(&[
        ("a", ResourceType::Txt, b"alpha".to_vec()),
        ("b", ResourceType::Txt, Vec::new()),
        ("c", ResourceType::Other(12345), vec![0xff; 300]),
    ]);
    let rim = RimFile::open(bytes.clone()).unwrap();

    for (idx, res) in rim.resources().iter().enumerate() {
        let start = res.offset as usize;
        let end = start + res.size as usize;
        assert!(end <= bytes.len());
        assert_eq!(rim.resource_data(res).unwrap(), &bytes[start..end]);
        assert_eq!(rim.resource_data_at(idx).unwrap(), &bytes[start..end]);
    }

    let last = rim.resource_count() - 1;
    assert!(rim.resource_data_at(last).is_ok());
    assert!(matches!(
        rim.resource_data_at(last + 1),
        Err(Error::IndexOutOfRange { .. })
    ));
}

#[test]
fn foreign_files_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let rim_path = dir.path().join("fake.rim");
    let ncs_path = dir.path().join("fake.ncs");
    fs::write(&rim_path, create_script()).unwrap();
    fs::write(&ncs_path, create_archive(&[])).unwrap();

    assert!(matches!(
        RimFile::open(rim_path),
        Err(Error::FormatMismatch { .. })
    ));
    assert!(matches!(
        NcsFile::open("fake", ncs_path),
        Err(Error::FormatMismatch { .. })
    ));
    assert!(matches!(
        RimFile::open(dir.path().join("missing.rim")),
        Err(Error::Io(_))
    ));
}

#[test]
fn archive_is_usable_through_the_provider_trait() {
    let rim = RimFile::open(create_archive(&[(
        "door01",
        ResourceType::Utd,
        b"UTD V3.2".to_vec(),
    )]))
    .unwrap();
    let providers: Vec<Box<dyn ResourceProvider>> = vec![Box::new(rim)];

    let found = providers
        .iter()
        .filter(|p| p.supports(ResourceType::Utd))
        .find_map(|p| p.find("Door01", ResourceType::Utd).unwrap());
    assert_eq!(found, Some(&b"UTD V3.2"[..]));
}
