use std::hash::{Hash, Hasher};
use std::mem;

/// Kinds of resources stored in archives, identified by a 16-bit type code.
///
/// Equality and hashing follow the type code, so `Other(2010)` equals `Ncs`.
#[derive(Debug, Clone, Copy)]
pub enum ResourceType {
    Bmp,
    Tga,
    Wav,
    Plt,
    Ini,
    Txt,
    Mdl,
    Nss,
    Ncs,
    Are,
    Set,
    Ifo,
    Bic,
    Wok,
    TwoDa,
    Txi,
    Git,
    Bti,
    Uti,
    Btc,
    Utc,
    Dlg,
    Itp,
    Utt,
    Dds,
    Uts,
    Ltr,
    Gff,
    Fac,
    Ute,
    Utd,
    Utp,
    Dft,
    Gic,
    Gui,
    Utm,
    Dwk,
    Pwk,
    Jrl,
    Utw,
    Ssf,
    Ndb,
    Ptm,
    Ptt,
    Lyt,
    Vis,
    Pth,
    Lip,
    Tpc,
    Mdx,
    Erf,
    Bif,
    Key,
    /// A type code this reader has no name for
    Other(u16),
}

const KNOWN_TYPES: &[(ResourceType, u16, &str)] = &[
    (ResourceType::Bmp, 1, "bmp"),
    (ResourceType::Tga, 3, "tga"),
    (ResourceType::Wav, 4, "wav"),
    (ResourceType::Plt, 6, "plt"),
    (ResourceType::Ini, 7, "ini"),
    (ResourceType::Txt, 10, "txt"),
    (ResourceType::Mdl, 2002, "mdl"),
    (ResourceType::Nss, 2009, "nss"),
    (ResourceType::Ncs, 2010, "ncs"),
    (ResourceType::Are, 2012, "are"),
    (ResourceType::Set, 2013, "set"),
    (ResourceType::Ifo, 2014, "ifo"),
    (ResourceType::Bic, 2015, "bic"),
    (ResourceType::Wok, 2016, "wok"),
    (ResourceType::TwoDa, 2017, "2da"),
    (ResourceType::Txi, 2022, "txi"),
    (ResourceType::Git, 2023, "git"),
    (ResourceType::Bti, 2024, "bti"),
    (ResourceType::Uti, 2025, "uti"),
    (ResourceType::Btc, 2026, "btc"),
    (ResourceType::Utc, 2027, "utc"),
    (ResourceType::Dlg, 2029, "dlg"),
    (ResourceType::Itp, 2030, "itp"),
    (ResourceType::Utt, 2032, "utt"),
    (ResourceType::Dds, 2033, "dds"),
    (ResourceType::Uts, 2035, "uts"),
    (ResourceType::Ltr, 2036, "ltr"),
    (ResourceType::Gff, 2037, "gff"),
    (ResourceType::Fac, 2038, "fac"),
    (ResourceType::Ute, 2040, "ute"),
    (ResourceType::Utd, 2042, "utd"),
    (ResourceType::Utp, 2044, "utp"),
    (ResourceType::Dft, 2045, "dft"),
    (ResourceType::Gic, 2046, "gic"),
    (ResourceType::Gui, 2047, "gui"),
    (ResourceType::Utm, 2051, "utm"),
    (ResourceType::Dwk, 2052, "dwk"),
    (ResourceType::Pwk, 2053, "pwk"),
    (ResourceType::Jrl, 2056, "jrl"),
    (ResourceType::Utw, 2058, "utw"),
    (ResourceType::Ssf, 2060, "ssf"),
    (ResourceType::Ndb, 2064, "ndb"),
    (ResourceType::Ptm, 2065, "ptm"),
    (ResourceType::Ptt, 2066, "ptt"),
    (ResourceType::Lyt, 3000, "lyt"),
    (ResourceType::Vis, 3001, "vis"),
    (ResourceType::Pth, 3003, "pth"),
    (ResourceType::Lip, 3004, "lip"),
    (ResourceType::Tpc, 3007, "tpc"),
    (ResourceType::Mdx, 3008, "mdx"),
    (ResourceType::Erf, 9997, "erf"),
    (ResourceType::Bif, 9998, "bif"),
    (ResourceType::Key, 9999, "key"),
];

impl ResourceType {
    /// Map a directory type code to a resource type; unknown codes are preserved
    pub fn from_code(code: u16) -> Self {
        KNOWN_TYPES
            .iter()
            .find(|(_, known, _)| *known == code)
            .map(|(ty, _, _)| *ty)
            .unwrap_or(ResourceType::Other(code))
    }

    pub fn code(&self) -> u16 {
        match self {
            ResourceType::Other(code) => *code,
            ty => KNOWN_TYPES
                .iter()
                .find(|(known, _, _)| mem::discriminant(known) == mem::discriminant(ty))
                .map(|(_, code, _)| *code)
                .unwrap_or(u16::MAX),
        }
    }

    /// Conventional file extension, if the type has one
    pub fn extension(&self) -> Option<&'static str> {
        let code = self.code();
        KNOWN_TYPES
            .iter()
            .find(|(_, known, _)| *known == code)
            .map(|(_, _, ext)| *ext)
    }

    /// Case-insensitive lookup by file extension (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        KNOWN_TYPES
            .iter()
            .find(|(_, _, known)| *known == ext)
            .map(|(ty, _, _)| *ty)
    }
}

impl PartialEq for ResourceType {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for ResourceType {}

impl Hash for ResourceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }
}

impl From<u16> for ResourceType {
    fn from(code: u16) -> Self {
        ResourceType::from_code(code)
    }
}

impl From<ResourceType> for u16 {
    fn from(ty: ResourceType) -> Self {
        ty.code()
    }
}
