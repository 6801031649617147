use super::{DocumentKind, LicenseFamily};
use std::path::Path;

/// How far into a file we look for NUL bytes when sniffing binaries.
const BINARY_SNIFF_LEN: usize = 8 * 1024;

const ARCHIVE_EXTENSIONS: &[&str] = &[
    "jar", "zip", "tar", "gz", "tgz", "bz2", "xz", "7z", "war", "ear", "rar",
];

const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "ico", "bmp", "class", "so", "dll", "dylib", "exe", "o", "a",
    "pdf", "woff", "woff2", "ttf", "otf", "eot", "bin", "jks", "keystore", "pyc",
];

const NOTICE_STEMS: &[&str] = &["LICENSE", "LICENCE", "NOTICE", "COPYING", "COPYRIGHT"];

/// Markers of machine-generated files, matched verbatim against raw text.
const GENERATED_MARKERS: &[&str] = &[
    "generated by Cayenne",
    "Generated By:JJTree",
    "Generated By:JavaCC",
    "THIS FILE IS AUTOMATICALLY GENERATED",
    "NOTE: this file is autogenerated by XBeans",
    "This file was automatically generated by",
    "# WARNING: DO NOT EDIT OR DELETE THIS WORKSPACE FILE!",
    "# Microsoft Developer Studio Generated NMAKE File",
    "# Microsoft Developer Studio Generated Build File",
    "Generated from configure.ac by autoheader",
    "generated automatically by aclocal",
    "build.xml generated by maven from project.xml",
    "This file was generated by",
    "This file has been automatically generated.",
    "Automatically generated - do not modify!",
    "Javadoc style sheet",
    "Generated by the Batik",
    "this file is autogenerated",
    "This class was autogenerated",
    "Generated by Maven",
    "Autogenerated by Thrift",
    "DO NOT EDIT THIS FILE - it is machine generated",
    "This class was generated by",
    "Generated by javadoc",
];

/// A built-in license family and the normalized phrases that identify it.
struct BuiltinLicense {
    category: &'static str,
    name: &'static str,
    phrases: &'static [&'static str],
}

// Order matters: the first family with a matching phrase wins.
const BUILTIN_LICENSES: &[BuiltinLicense] = &[
    BuiltinLicense {
        category: "AL",
        name: "Apache License Version 2.0",
        phrases: &[
            "licensedtotheapachesoftwarefoundationasfunderoneormorecontributorlicenseagreements",
            "licensedundertheapachelicenseversion20",
            "wwwapacheorglicenseslicense20",
        ],
    },
    BuiltinLicense {
        category: "MIT",
        name: "The MIT License",
        phrases: &[
            "permissionisherebygrantedfreeofchargetoanypersonobtainingacopyofthissoftwareandassociateddocumentationfiles",
        ],
    },
    BuiltinLicense {
        category: "BSD",
        name: "BSD License",
        phrases: &[
            "redistributionanduseinsourceandbinaryformswithorwithoutmodificationarepermittedprovidedthatthefollowingconditionsaremet",
        ],
    },
    BuiltinLicense {
        category: "GPL1",
        name: "GNU General Public License, version 1",
        phrases: &["thetermsofthegnugeneralpubliclicenseaspublishedbythefreesoftwarefoundationeitherversion1"],
    },
    BuiltinLicense {
        category: "GPL2",
        name: "GNU General Public License, version 2",
        phrases: &["thetermsofthegnugeneralpubliclicenseaspublishedbythefreesoftwarefoundationeitherversion2"],
    },
    BuiltinLicense {
        category: "GPL3",
        name: "GNU General Public License, version 3",
        phrases: &["thetermsofthegnugeneralpubliclicenseaspublishedbythefreesoftwarefoundationeitherversion3"],
    },
    BuiltinLicense {
        category: "CDDL1",
        name: "Common Development and Distribution License, version 1.0",
        phrases: &["commondevelopmentanddistributionlicensecddl"],
    },
    BuiltinLicense {
        category: "W3C",
        name: "W3C Software Copyright",
        phrases: &["wwww3orgconsortiumlegal2002copyrightsoftware20021231"],
    },
    BuiltinLicense {
        category: "W3CD",
        name: "W3C Document Copyright",
        phrases: &["wwww3orgconsortiumlegal2002copyrightdocuments20021231"],
    },
    BuiltinLicense {
        category: "OASIS",
        name: "OASIS Open License",
        phrases: &["copyrightcoasisopen", "copyrightoasisopen"],
    },
    BuiltinLicense {
        category: "DOJO",
        name: "Dojo License",
        phrases: &["dojofoundationallrightsreserved"],
    },
    BuiltinLicense {
        category: "TMF",
        name: "TMF854 License",
        phrases: &["tmf854version10copyrighttelemanagementforum"],
    },
];

pub fn apache_family() -> LicenseFamily {
    LicenseFamily::new("AL", "Apache License Version 2.0")
}

pub fn generated_family() -> LicenseFamily {
    LicenseFamily::new("GEN", "Generated Documents")
}

pub fn binary_family() -> LicenseFamily {
    LicenseFamily::new("BIN", "Binary File")
}

pub fn archive_family() -> LicenseFamily {
    LicenseFamily::new("ARC", "Archive File")
}

pub fn notice_family() -> LicenseFamily {
    LicenseFamily::new("NOT", "Notice File")
}

/// Every family the default matcher can produce.
pub fn builtin_families() -> Vec<LicenseFamily> {
    let mut families: Vec<LicenseFamily> = BUILTIN_LICENSES
        .iter()
        .map(|l| LicenseFamily::new(l.category, l.name))
        .collect();
    families.push(generated_family());
    families.push(binary_family());
    families.push(archive_family());
    families.push(notice_family());
    families
}

/// The built-in matcher: recognizes well-known license headers, generated
/// files and non-source documents.
#[derive(Debug, Clone, Default)]
pub struct DefaultMatcher;

impl DefaultMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Exemption family for documents that are not source text.
    pub fn match_document(&self, kind: DocumentKind) -> Option<LicenseFamily> {
        match kind {
            DocumentKind::Standard => None,
            DocumentKind::Binary => Some(binary_family()),
            DocumentKind::Archive => Some(archive_family()),
            DocumentKind::Notice => Some(notice_family()),
        }
    }

    /// `normalized` must be `normalize_header_text(raw)`.
    pub fn match_header(&self, raw: &str, normalized: &str) -> Option<LicenseFamily> {
        // Apache headers take precedence over generated markers
        let apache = &BUILTIN_LICENSES[0];
        if apache.phrases.iter().any(|p| normalized.contains(p)) {
            return Some(LicenseFamily::new(apache.category, apache.name));
        }

        if GENERATED_MARKERS.iter().any(|m| raw.contains(m)) {
            return Some(generated_family());
        }

        BUILTIN_LICENSES[1..]
            .iter()
            .find(|l| l.phrases.iter().any(|p| normalized.contains(p)))
            .map(|l| LicenseFamily::new(l.category, l.name))
    }
}

/// Decide the document kind from the file name and its leading bytes.
pub fn detect_document_kind(path: &str, content: &[u8]) -> DocumentKind {
    let file_name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path);
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
        .to_ascii_uppercase();

    if let Some(ext) = extension.as_deref() {
        if ARCHIVE_EXTENSIONS.contains(&ext) {
            return DocumentKind::Archive;
        }
        if BINARY_EXTENSIONS.contains(&ext) {
            return DocumentKind::Binary;
        }
    }

    let notice_ext = matches!(extension.as_deref(), None | Some("txt") | Some("md"));
    if notice_ext && NOTICE_STEMS.contains(&stem.as_str()) {
        return DocumentKind::Notice;
    }

    let sniff = &content[..content.len().min(BINARY_SNIFF_LEN)];
    if sniff.contains(&0) {
        return DocumentKind::Binary;
    }

    DocumentKind::Standard
}
