//! Indentation-aware text sink for CMakeLists.txt.
//!
//! Every other emission layer writes through [`CMakeFile`]. The buffer is
//! append-only and lives in memory until [`CMakeFile::close`] writes it out
//! exactly once.

use std::path::Path;

use anyhow::Result;

use crate::util::fs::write_atomic;
use crate::util::hash::sha256_str;

/// Marker written on the first line of every generated file.
pub const AUTOGEN_MARKER: &str = "# Autogenerated file; DO NOT EDIT!";

/// One indentation level.
pub const INDENT: &str = "  ";

/// An in-progress CMakeLists.txt.
#[derive(Debug, Default)]
pub struct CMakeFile {
    /// Accumulated lines
    output: String,

    /// Prefix written before each non-empty line
    indent: String,
}

impl CMakeFile {
    /// Create an empty file with no preamble.
    pub fn new() -> Self {
        CMakeFile::default()
    }

    /// Open a CMake project named `name`, writing the fixed preamble.
    pub fn open(name: &str) -> Self {
        let mut cmake = CMakeFile::new();
        cmake.write_line(AUTOGEN_MARKER);
        cmake.write_line("cmake_minimum_required(VERSION 3.12.0)");
        cmake.write_line(&format!("project(\"{}\")", name));
        cmake.write_empty_line();
        for module in [
            "CheckIncludeFileCXX",
            "CheckLibraryExists",
            "CheckFunctionExists",
            "CheckSymbolExists",
            "CheckCXXCompilerFlag",
            "GNUInstallDirs",
        ] {
            cmake.write_line(&format!("include({})", module));
        }
        cmake.write_line("set(THREADS_PREFER_PTHREAD_FLAG ON)");
        cmake.write_line("find_package(Threads REQUIRED)");
        cmake.write_line("set(CMAKE_POSITION_INDEPENDENT_CODE ON)");
        cmake.write_line("set(CMAKE_CXX_STANDARD 11)");
        cmake.write_line("set(CMAKE_CXX_STANDARD_REQUIRED ON)");
        cmake.write_line("set(CMAKE_CXX_EXTENSIONS OFF)");
        cmake.write_line("set(CMAKE_C_STANDARD 11)");
        cmake.write_line("set(CMAKE_C_STANDARD_REQUIRED ON)");
        cmake.write_line("set(CMAKE_C_EXTENSIONS OFF)");
        cmake.write_line("list(APPEND CMAKE_REQUIRED_LIBRARIES Threads::Threads)");
        cmake.write_line("if((\"${WIN32}\"))");
        cmake.write_line("  list(APPEND CMAKE_REQUIRED_LIBRARIES ws2_32 crypt32)");
        cmake.write_line("  if((\"${MINGW}\"))");
        cmake.write_line(
            "    list(APPEND CMAKE_REQUIRED_LIBRARIES -static-libgcc -static-libstdc++)",
        );
        cmake.write_line("  endif()");
        cmake.write_line("endif()");
        cmake.write_line("enable_testing()");
        cmake
    }

    /// Append `line` prefixed by the current indent.
    ///
    /// An empty `line` appends a bare newline without indentation.
    pub fn write_line(&mut self, line: &str) {
        if !line.is_empty() {
            self.output.push_str(&self.indent);
            self.output.push_str(line);
        }
        self.output.push('\n');
    }

    /// Append a blank line.
    pub fn write_empty_line(&mut self) {
        self.write_line("");
    }

    /// Append the bordered comment used to delimit sections.
    pub fn write_section_comment(&mut self, title: &str) {
        self.write_empty_line();
        self.write_line("#");
        self.write_line(&format!("# {}", title));
        self.write_line("#");
        self.write_empty_line();
    }

    /// Run `body` with `extra` appended to the indent.
    ///
    /// The previous indent is restored whether or not `body` succeeds.
    pub fn with_indent<F>(&mut self, extra: &str, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let saved = self.indent.len();
        self.indent.push_str(extra);
        let result = body(self);
        self.indent.truncate(saved);
        result
    }

    /// The current indent prefix.
    pub fn indent(&self) -> &str {
        &self.indent
    }

    /// Text accumulated so far.
    pub fn contents(&self) -> &str {
        &self.output
    }

    /// SHA256 of the text accumulated so far.
    pub fn fingerprint(&self) -> String {
        sha256_str(&self.output)
    }

    /// Write the accumulated text to `path`, replacing any previous content.
    ///
    /// The write goes through a temporary file in the same directory, so a
    /// failure leaves the previous artifact untouched.
    pub fn close(self, path: &Path) -> Result<()> {
        write_atomic(path, &self.output, 0o644)?;
        tracing::info!("Written {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use tempfile::TempDir;

    #[test]
    fn test_write_line_indents_non_empty_lines() {
        let mut cmake = CMakeFile::new();
        cmake
            .with_indent("  ", |cmake| {
                cmake.write_line("set(A 1)");
                cmake.write_empty_line();
                Ok(())
            })
            .unwrap();
        cmake.write_line("set(B 2)");

        assert_eq!(cmake.contents(), "  set(A 1)\n\nset(B 2)\n");
    }

    #[test]
    fn test_section_comment_layout() {
        let mut cmake = CMakeFile::new();
        cmake.write_section_comment("argh.h");
        assert_eq!(cmake.contents(), "\n#\n# argh.h\n#\n\n");
    }

    #[test]
    fn test_with_indent_nests() {
        let mut cmake = CMakeFile::new();
        cmake
            .with_indent("  ", |cmake| {
                cmake.with_indent("  ", |cmake| {
                    cmake.write_line("inner");
                    Ok(())
                })?;
                cmake.write_line("outer");
                Ok(())
            })
            .unwrap();

        assert_eq!(cmake.contents(), "    inner\n  outer\n");
        assert_eq!(cmake.indent(), "");
    }

    #[test]
    fn test_with_indent_restores_on_error() {
        let mut cmake = CMakeFile::new();
        cmake
            .with_indent("  ", |cmake| {
                let result = cmake.with_indent("    ", |cmake| {
                    cmake.write_line("partial");
                    bail!("body failed")
                });
                assert!(result.is_err());
                assert_eq!(cmake.indent(), "  ");
                Ok(())
            })
            .unwrap();

        assert_eq!(cmake.indent(), "");
        cmake.write_line("after");
        assert!(cmake.contents().ends_with("\nafter\n"));
    }

    #[test]
    fn test_open_writes_preamble() {
        let cmake = CMakeFile::open("demo");
        let text = cmake.contents();
        assert!(text.starts_with(AUTOGEN_MARKER));
        assert!(text.contains("project(\"demo\")"));
        assert!(text.contains("find_package(Threads REQUIRED)"));
        assert!(text.trim_end().ends_with("enable_testing()"));
    }

    #[test]
    fn test_close_overwrites_previous_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("CMakeLists.txt");
        std::fs::write(&path, "stale content that is much longer than the new one").unwrap();

        let mut cmake = CMakeFile::new();
        cmake.write_line("project(\"x\")");
        cmake.close(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "project(\"x\")\n");
    }

    #[test]
    fn test_close_fails_for_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing").join("CMakeLists.txt");

        let cmake = CMakeFile::open("demo");
        assert!(cmake.close(&path).is_err());
        assert!(!path.exists());
    }
}
