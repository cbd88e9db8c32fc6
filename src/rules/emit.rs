//! Rule interpretation.

use anyhow::Result;

use super::{Download, PrebuiltPackage, Rule, RuleKind, SystemLibrary};
use crate::cmake::commands::{variable_suffix, DATA_DIR, DOWNLOAD_DIR, INCLUDE_DIR};
use crate::cmake::{CMakeFile, Condition, NO_ELSE};

impl CMakeFile {
    /// Emit the section provisioning `rule`.
    pub fn apply_rule(&mut self, rule: &Rule) -> Result<()> {
        tracing::debug!("applying {} rule for {}", rule.kind.as_str(), rule.id);
        self.write_section_comment(&format!("dependency: {}", rule.id));
        match &rule.kind {
            RuleKind::SingleHeader(download) => self.single_header(download),
            RuleKind::SingleAsset(download) => self.single_asset(download),
            RuleKind::SystemLibrary(system) => self.system_library(system),
            RuleKind::Prebuilt { windows, otherwise } => self.if_windows(
                |cmake| cmake.prebuilt_package(windows),
                Some(|cmake: &mut CMakeFile| cmake.system_library(otherwise)),
            ),
            RuleKind::ArchiveBundle(download) => {
                self.download_and_extract(&download.file_name()?, download.sha256, download.url);
                Ok(())
            }
        }
    }

    fn single_header(&mut self, download: &Download) -> Result<()> {
        let header = download.file_name()?;
        self.mkdir_all(INCLUDE_DIR);
        self.download(
            &format!("{}/{}", INCLUDE_DIR, header),
            download.sha256,
            download.url,
        );
        self.add_include_dir(INCLUDE_DIR);
        self.require_header_exists(&header);
        Ok(())
    }

    fn single_asset(&mut self, download: &Download) -> Result<()> {
        let asset = download.file_name()?;
        self.mkdir_all(DATA_DIR);
        self.download(&format!("{}/{}", DATA_DIR, asset), download.sha256, download.url);
        Ok(())
    }

    fn system_library(&mut self, system: &SystemLibrary) -> Result<()> {
        if let Some(prefix) = system.homebrew {
            self.if_apple(
                |cmake| {
                    cmake.conditional(
                        &Condition::PathExists(prefix.to_string()),
                        |cmake| {
                            cmake.homebrew_prefix(prefix);
                            Ok(())
                        },
                        NO_ELSE,
                    )
                },
                NO_ELSE,
            )?;
        }
        for check in system.checks {
            self.require_header_exists(check.header);
            self.require_library_exists(check.library, check.symbol);
            self.add_library(check.library);
        }
        Ok(())
    }

    fn homebrew_prefix(&mut self, prefix: &str) {
        self.set_variable(
            "CMAKE_CXX_FLAGS",
            &format!("${{CMAKE_CXX_FLAGS}} -I{}/include", prefix),
        );
        for linker in ["EXE", "SHARED", "STATIC"] {
            let variable = format!("CMAKE_{}_LINKER_FLAGS", linker);
            self.set_variable(&variable, &format!("${{{}}} -L{}/lib", variable, prefix));
        }
    }

    fn prebuilt_package(&mut self, package: &PrebuiltPackage) -> Result<()> {
        let archive = &package.archive;
        self.download_and_extract(&archive.file_name()?, archive.sha256, archive.url);

        let arch = format!("MK_{}_ARCH", variable_suffix(package.name));
        self.if_pointer_width(
            |cmake| {
                cmake.set_variable(&arch, "x86");
                Ok(())
            },
            |cmake| {
                cmake.set_variable(&arch, "x64");
                Ok(())
            },
        )?;
        self.write_empty_line();

        let root = format!("{}/{}/${{{}}}", DOWNLOAD_DIR, package.prefix, arch);
        self.add_include_dir(&format!("{}/include", root));
        self.require_header_exists(package.header);
        self.write_empty_line();

        for lib in package.libs {
            let path = format!("{}/lib/{}", root, lib.name);
            self.require_library_exists(&path, lib.symbol);
            self.add_library(&path);
        }
        for definition in package.definitions {
            self.add_definition(definition);
        }
        Ok(())
    }
}
