use log::{debug, trace};

use crate::config::ReaderConfig;
use crate::cursor::{BinaryCursor, Endianness};
use crate::error::{Error, Result};
use crate::resource::{ResourceProvider, ResourceType};
use crate::source::ByteSource;

pub const SIGNATURE: &[u8; 8] = b"RIM V1.0";

/// Width of one directory record: name(16) + type(2) + reserved(6) + offset(4) + size(4)
pub const DESCRIPTOR_SIZE: usize = 32;

const NAME_SIZE: usize = 16;

/// One directory entry of a RIM archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Lower-cased resource name
    pub name: String,
    pub ty: ResourceType,
    pub offset: u32,
    pub size: u32,
}

impl Resource {
    /// Absolute end offset of the payload, computed without overflow
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.size as u64
    }
}

/// A loaded RIM archive: the raw bytes plus the directory parsed from them.
///
/// Opening validates the signature and loads the whole directory. Payloads are
/// sliced out of the buffer on request.
#[derive(Debug)]
pub struct RimFile {
    data: Vec<u8>,
    resources_offset: u32,
    resources: Vec<Resource>,
}

impl RimFile {
    /// Open an archive with the default configuration
    pub fn open<S: Into<ByteSource>>(source: S) -> Result<Self> {
        Self::open_with_config(source, &ReaderConfig::default())
    }

    pub fn open_with_config<S: Into<ByteSource>>(source: S, config: &ReaderConfig) -> Result<Self> {
        let data = source.into().into_bytes()?;
        let mut cursor = BinaryCursor::open(&data, SIGNATURE, Endianness::Little)?;

        cursor.ignore(4)?;
        let resource_count = cursor.read_u32()?;
        let resources_offset = cursor.read_u32()?;

        if resource_count > config.max_resource_count {
            return Err(Error::ResourceLimitExceeded {
                count: resource_count,
                limit: config.max_resource_count,
            });
        }

        let resources = Self::load_resources(&mut cursor, resource_count, resources_offset, config)?;
        debug!(
            "Loaded RIM archive: {} resources, directory at {:#x}, {} bytes",
            resources.len(),
            resources_offset,
            data.len()
        );

        Ok(Self {
            data,
            resources_offset,
            resources,
        })
    }

    fn load_resources(
        cursor: &mut BinaryCursor<'_>,
        count: u32,
        offset: u32,
        config: &ReaderConfig,
    ) -> Result<Vec<Resource>> {
        cursor.seek(offset as usize)?;

        // Never reserve more than the remaining bytes could possibly describe
        let capacity = (count as usize).min(cursor.remaining() / DESCRIPTOR_SIZE);
        let mut resources = Vec::with_capacity(capacity);
        for _ in 0..count {
            let resource = Self::read_resource(cursor)?;
            trace!(
                "Resource {}: {} type {} at {:#x} ({} bytes)",
                resources.len(),
                resource.name,
                resource.ty.code(),
                resource.offset,
                resource.size
            );
            resources.push(resource);
        }

        if config.validate_resource_bounds {
            let len = cursor.len();
            if let Some(res) = resources.iter().find(|res| res.end() > len as u64) {
                return Err(Error::OutOfRange {
                    offset: usize::try_from(res.end()).unwrap_or(usize::MAX),
                    len,
                });
            }
        }
        Ok(resources)
    }

    fn read_resource(cursor: &mut BinaryCursor<'_>) -> Result<Resource> {
        let name = cursor.read_fixed_string(NAME_SIZE)?;
        let ty = cursor.read_u16()?;
        cursor.ignore(4 + 2)?;
        let offset = cursor.read_u32()?;
        let size = cursor.read_u32()?;

        Ok(Resource {
            name: name.to_lowercase(),
            ty: ResourceType::from_code(ty),
            offset,
            size,
        })
    }

    /// Find a resource by case-insensitive name and exact type
    pub fn find(&self, name: &str, ty: ResourceType) -> Result<Option<&[u8]>> {
        let name = name.to_lowercase();
        match self
            .resources
            .iter()
            .find(|res| res.name == name && res.ty == ty)
        {
            Some(res) => self.resource_data(res).map(Some),
            None => Ok(None),
        }
    }

    /// Payload bytes of a directory entry
    pub fn resource_data(&self, res: &Resource) -> Result<&[u8]> {
        if res.end() > self.data.len() as u64 {
            return Err(Error::OutOfRange {
                offset: usize::try_from(res.end()).unwrap_or(usize::MAX),
                len: self.data.len(),
            });
        }
        let mut cursor = BinaryCursor::new(&self.data, Endianness::Little);
        cursor.read_array_at(res.offset as usize, res.size as usize)
    }

    /// Payload bytes of the entry at `index` in directory order
    pub fn resource_data_at(&self, index: usize) -> Result<&[u8]> {
        let res = self.resources.get(index).ok_or(Error::IndexOutOfRange {
            index,
            count: self.resources.len(),
        })?;
        self.resource_data(res)
    }

    /// The directory, in file order
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn resources_offset(&self) -> u32 {
        self.resources_offset
    }

    /// Size of the whole archive in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// RIM archives accept every resource type
    pub fn supports(&self, _ty: ResourceType) -> bool {
        true
    }
}

impl ResourceProvider for RimFile {
    fn supports(&self, ty: ResourceType) -> bool {
        RimFile::supports(self, ty)
    }

    fn find(&self, name: &str, ty: ResourceType) -> Result<Option<&[u8]>> {
        RimFile::find(self, name, ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{LittleEndian, WriteBytesExt};

    /// Helper function to build an archive with the directory right after the header
    fn create_archive(entries: &[(&str, u16, &[u8])]) -> Vec<u8> {
        let header_size = 20;
        let directory_size = entries.len() * DESCRIPTOR_SIZE;

        let mut data = Vec::new();
        data.extend_from_slice(SIGNATURE);
        data.write_u32::<LittleEndian>(0).unwrap(); // Reserved
        data.write_u32::<LittleEndian>(entries.len() as u32).unwrap();
        data.write_u32::<LittleEndian>(header_size as u32).unwrap();

        let mut payload_offset = header_size + directory_size;
        for (name, ty, payload) in entries {
            let mut field = [0u8; NAME_SIZE];
            field[..name.len()].copy_from_slice(name.as_bytes());
            data.extend_from_slice(&field);
            data.write_u16::<LittleEndian>(*ty).unwrap();
            data.extend_from_slice(&[0xAA; 6]); // Reserved
            data.write_u32::<LittleEndian>(payload_offset as u32).unwrap();
            data.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
            payload_offset += payload.len();
        }
        for (_, _, payload) in entries {
            data.extend_from_slice(payload);
        }
        data
    }

    fn sample_archive() -> Vec<u8> {
        create_archive(&[
            ("Door01", 2044, b"door blueprint"),
            ("door01", 2010, b"NCS V1.0"),
            ("m01aa", 2014, b"module info"),
        ])
    }

    #[test]
    fn test_load_directory() {
        let rim = RimFile::open(sample_archive()).unwrap();
        assert_eq!(rim.resource_count(), 3);
        assert_eq!(rim.resources_offset(), 20);

        let first = &rim.resources()[0];
        assert_eq!(first.name, "door01");
        assert_eq!(first.ty, ResourceType::Utp);
        assert_eq!(first.offset, 20 + 3 * 32);
        assert_eq!(first.size, 14);

        for res in rim.resources() {
            assert!(res.end() <= rim.len() as u64);
        }
    }

    #[test]
    fn test_find_is_case_insensitive_and_type_exact() {
        let rim = RimFile::open(sample_archive()).unwrap();

        let data = rim.find("DOOR01", ResourceType::Utp).unwrap();
        assert_eq!(data, Some(&b"door blueprint"[..]));

        let data = rim.find("door01", ResourceType::Ncs).unwrap();
        assert_eq!(data, Some(&b"NCS V1.0"[..]));

        assert_eq!(rim.find("door01", ResourceType::Utc).unwrap(), None);
        assert_eq!(rim.find("door02", ResourceType::Utp).unwrap(), None);
    }

    #[test]
    fn test_resource_data_matches_source_slice() {
        let bytes = sample_archive();
        let rim = RimFile::open(bytes.clone()).unwrap();
        for res in rim.resources() {
            let start = res.offset as usize;
            let end = start + res.size as usize;
            assert_eq!(rim.resource_data(res).unwrap(), &bytes[start..end]);
        }
    }

    #[test]
    fn test_resource_data_at_bounds() {
        let rim = RimFile::open(sample_archive()).unwrap();
        assert_eq!(rim.resource_data_at(2).unwrap(), b"module info");
        match rim.resource_data_at(3) {
            Err(Error::IndexOutOfRange { index, count }) => {
                assert_eq!(index, 3);
                assert_eq!(count, 3);
            }
            other => panic!("Expected IndexOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_signature() {
        let mut bytes = sample_archive();
        bytes[..8].copy_from_slice(b"ERF V1.0");
        assert!(matches!(
            RimFile::open(bytes),
            Err(Error::FormatMismatch { .. })
        ));
    }

    #[test]
    fn test_truncated_directory_fails_whole_load() {
        let mut bytes = create_archive(&[("a", 10, b""), ("b", 10, b"")]);
        bytes.truncate(20 + 32 + 10);
        assert!(matches!(
            RimFile::open(bytes),
            Err(Error::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_directory_offset_past_end() {
        let mut bytes = create_archive(&[]);
        bytes[16..20].copy_from_slice(&1000u32.to_le_bytes());
        assert!(matches!(
            RimFile::open(bytes),
            Err(Error::OutOfRange { offset: 1000, .. })
        ));
    }

    #[test]
    fn test_empty_archive() {
        let rim = RimFile::open(create_archive(&[])).unwrap();
        assert!(rim.is_empty());
        assert!(rim.resources().is_empty());
        assert!(matches!(
            rim.resource_data_at(0),
            Err(Error::IndexOutOfRange { index: 0, count: 0 })
        ));
    }

    #[test]
    fn test_corrupt_descriptor_rejected_at_load() {
        let mut bytes = create_archive(&[("big", 10, b"abc")]);
        // Size field of the only descriptor
        bytes[20 + 28..20 + 32].copy_from_slice(&500u32.to_le_bytes());
        assert!(matches!(
            RimFile::open(bytes),
            Err(Error::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_corrupt_descriptor_lenient_load() {
        let mut bytes = create_archive(&[("big", 10, b"abc"), ("ok", 10, b"xy")]);
        bytes[20 + 28..20 + 32].copy_from_slice(&500u32.to_le_bytes());

        let config = ReaderConfig::new().with_resource_bounds_validation(false);
        let rim = RimFile::open_with_config(bytes, &config).unwrap();
        assert!(matches!(
            rim.resource_data_at(0),
            Err(Error::OutOfRange { .. })
        ));
        assert!(matches!(
            rim.find("big", ResourceType::Txt),
            Err(Error::OutOfRange { .. })
        ));
        assert_eq!(rim.resource_data_at(1).unwrap(), b"xy");
    }

    #[test]
    fn test_resource_limit() {
        let bytes = create_archive(&[("a", 10, b"1"), ("b", 10, b"2")]);
        let config = ReaderConfig::new().with_max_resource_count(1);
        match RimFile::open_with_config(bytes, &config) {
            Err(Error::ResourceLimitExceeded { count, limit }) => {
                assert_eq!(count, 2);
                assert_eq!(limit, 1);
            }
            other => panic!("Expected ResourceLimitExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_code_is_kept() {
        let rim = RimFile::open(create_archive(&[("odd", 4242, b"?")])).unwrap();
        let ty = ResourceType::Other(4242);
        assert_eq!(rim.resources()[0].ty, ty);
        assert_eq!(rim.find("odd", ty).unwrap(), Some(&b"?"[..]));
    }

    #[test]
    fn test_find_by_raw_type_code() {
        let rim = RimFile::open(sample_archive()).unwrap();
        let data = rim.find("door01", ResourceType::Other(2010)).unwrap();
        assert_eq!(data, Some(&b"NCS V1.0"[..]));
        assert_eq!(rim.find("door01", ResourceType::from(2044)).unwrap(), Some(&b"door blueprint"[..]));
    }

    #[test]
    fn test_supports_every_type() {
        let rim = RimFile::open(create_archive(&[])).unwrap();
        assert!(rim.supports(ResourceType::Ncs));
        assert!(rim.supports(ResourceType::Other(7777)));

        let provider: &dyn ResourceProvider = &rim;
        assert!(provider.supports(ResourceType::Tpc));
        assert_eq!(provider.find("missing", ResourceType::Tpc).unwrap(), None);
    }

    #[test]
    fn test_queries_are_idempotent() {
        let rim = RimFile::open(sample_archive()).unwrap();
        let first = rim.resources().to_vec();
        let _ = rim.find("door01", ResourceType::Utp).unwrap();
        let _ = rim.resource_data_at(1).unwrap();
        assert_eq!(rim.resources(), &first[..]);
    }
}
