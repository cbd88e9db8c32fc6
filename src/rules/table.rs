//! The known dependencies.
//!
//! Entries are sorted by identifier; [`super::lookup`] relies on it.

use super::{
    Download, LibraryCheck, PrebuiltLibrary, PrebuiltPackage, Rule, RuleKind, SystemLibrary,
};

const fn single_header(id: &'static str, sha256: &'static str, url: &'static str) -> Rule {
    Rule {
        id,
        kind: RuleKind::SingleHeader(Download { sha256, url }),
        deprecated_by: None,
    }
}

const CURL_CHECKS: &[LibraryCheck] = &[LibraryCheck {
    header: "curl/curl.h",
    library: "curl",
    symbol: "curl_easy_init",
}];

const MAXMINDDB_CHECKS: &[LibraryCheck] = &[LibraryCheck {
    header: "maxminddb.h",
    library: "maxminddb",
    symbol: "MMDB_open",
}];

/// Every dependency `mkbuild autogen` can provision.
pub static RULES: &[Rule] = &[
    Rule {
        id: "curl.haxx.se/ca",
        kind: RuleKind::SingleAsset(Download {
            sha256: "c1fd9b235896b1094ee97bfb7e042f93530b5e300781f59b45edf84ee8c75000",
            url: "https://curl.haxx.se/ca/cacert.pem",
        }),
        deprecated_by: Some("github.com/measurement-kit/generic-assets"),
    },
    single_header(
        "github.com/adishavit/argh",
        "ddb7dfc18dcf90149735b76fb2cff101067453a1df1943a6911233cb7085980c",
        "https://raw.githubusercontent.com/adishavit/argh/v1.3.0/argh.h",
    ),
    Rule {
        id: "github.com/c-ares/c-ares",
        kind: RuleKind::SystemLibrary(SystemLibrary {
            homebrew: None,
            checks: &[LibraryCheck {
                header: "ares.h",
                library: "cares",
                symbol: "ares_process",
            }],
        }),
        deprecated_by: None,
    },
    single_header(
        "github.com/catchorg/catch2",
        "5eb8532fd5ec0d28433eba8a749102fd1f98078c5ebf35ad607fb2455a000004",
        "https://github.com/catchorg/Catch2/releases/download/v2.3.0/catch.hpp",
    ),
    Rule {
        id: "github.com/curl/curl",
        kind: RuleKind::Prebuilt {
            windows: PrebuiltPackage {
                name: "curl",
                archive: Download {
                    sha256: "424d2f18f0f74dd6a0128f0f4e59860b7d2f00c80bbf24b2702e9cac661357cf",
                    url: "https://github.com/measurement-kit/prebuilt/releases/download/testing/windows-curl-7.61.1-1.tar.gz",
                },
                prefix: "MK_DIST/windows/curl/7.61.1-1",
                header: "curl/curl.h",
                libs: &[PrebuiltLibrary {
                    name: "libcurl.lib",
                    symbol: "curl_easy_init",
                }],
                definitions: &["-DCURL_STATICLIB"],
            },
            otherwise: SystemLibrary {
                homebrew: None,
                checks: CURL_CHECKS,
            },
        },
        deprecated_by: None,
    },
    single_header(
        "github.com/howardhinnant/date",
        "07aa75752540023ccccab178ed193f536c9d032cbbda997159af9f339d331eda",
        "https://raw.githubusercontent.com/HowardHinnant/date/v2.4.1/include/date/date.h",
    ),
    Rule {
        id: "github.com/maxmind/libmaxminddb",
        kind: RuleKind::Prebuilt {
            windows: PrebuiltPackage {
                name: "libmaxminddb",
                archive: Download {
                    sha256: "542933912814ac518037bd26083d0bba9daf68084f43c5cf2d7ec944d62b9ebb",
                    url: "https://github.com/measurement-kit/prebuilt/releases/download/testing/windows-libmaxminddb-1.3.2-2.tar.gz",
                },
                prefix: "MK_DIST/windows/libmaxminddb/1.3.2-2",
                header: "maxminddb.h",
                libs: &[PrebuiltLibrary {
                    name: "maxminddb.lib",
                    symbol: "MMDB_open",
                }],
                definitions: &[],
            },
            otherwise: SystemLibrary {
                homebrew: None,
                checks: MAXMINDDB_CHECKS,
            },
        },
        deprecated_by: None,
    },
    Rule {
        id: "github.com/measurement-kit/generic-assets",
        kind: RuleKind::ArchiveBundle(Download {
            sha256: "e7826c2575bacbc1aeccf64f10bfdf128c7ab38e6f5d17876775937986499df7",
            url: "https://github.com/measurement-kit/generic-assets/releases/download/20190205/generic-assets-20190205.tar.gz",
        }),
        deprecated_by: None,
    },
    single_header(
        "github.com/measurement-kit/mkbouncer",
        "b6d8cf8ce7c832b20997cbd2d2a33dbaf80a347eea4073173a7d8c1ef8f176ab",
        "https://raw.githubusercontent.com/measurement-kit/mkbouncer/v0.1.0/mkbouncer.hpp",
    ),
    single_header(
        "github.com/measurement-kit/mkcollector",
        "f6edaaf83c02255598827e566b54944bd8285b0387433bd2851fa97a5598deb7",
        "https://raw.githubusercontent.com/measurement-kit/mkcollector/v0.3.0/mkcollector.hpp",
    ),
    single_header(
        "github.com/measurement-kit/mkcurl",
        "2248b8a1e597bd7d1970138291ecd9a7d0c2070a50431c82e8499cc9529480f1",
        "https://raw.githubusercontent.com/measurement-kit/mkcurl/v0.10.0/mkcurl.hpp",
    ),
    single_header(
        "github.com/measurement-kit/mkdata",
        "96bb0384ecd7231a861111d8818a560b7d5ca83316cf7946a4f1a352db6ecfe3",
        "https://raw.githubusercontent.com/measurement-kit/mkdata/v0.3.0/mkdata.hpp",
    ),
    single_header(
        "github.com/measurement-kit/mkiplookup",
        "a815119250d09be5eff332289f90fd872910f3dc9f29bb4a5fe60e272b38174f",
        "https://raw.githubusercontent.com/measurement-kit/mkiplookup/v0.2.0/mkiplookup.hpp",
    ),
    single_header(
        "github.com/measurement-kit/mkmmdb",
        "c1cdcf2980c977a0d4abbdd447ddc19eefdfe6faa42b3be752d50f29930d4a87",
        "https://raw.githubusercontent.com/measurement-kit/mkmmdb/v0.4.0/mkmmdb.hpp",
    ),
    single_header(
        "github.com/measurement-kit/mkmock",
        "f07bc063a2e64484482f986501003e45ead653ea3f53fadbdb45c17a51d916d2",
        "https://raw.githubusercontent.com/measurement-kit/mkmock/v0.2.0/mkmock.hpp",
    ),
    single_header(
        "github.com/nlohmann/json",
        "8a6dbf3bf01156f438d0ca7e78c2971bca50eec4ca6f0cf59adf3464c43bb9d5",
        "https://raw.githubusercontent.com/nlohmann/json/v3.5.0/single_include/nlohmann/json.hpp",
    ),
    Rule {
        id: "github.com/openssl/openssl",
        kind: RuleKind::SystemLibrary(SystemLibrary {
            homebrew: Some("/usr/local/opt/openssl"),
            checks: &[
                LibraryCheck {
                    header: "openssl/rsa.h",
                    library: "crypto",
                    symbol: "RSA_new",
                },
                LibraryCheck {
                    header: "openssl/ssl.h",
                    library: "ssl",
                    symbol: "SSL_read",
                },
            ],
        }),
        deprecated_by: None,
    },
];
