//! Restrictive compiler and linker flags.
//!
//! The block is fixed: every generated project gets the same warnings,
//! hardening flags and fatal branch for unknown compilers.

use anyhow::Result;

use super::conditional::{Condition, NO_ELSE};
use super::CMakeFile;

/// Flags for both C and C++ with GCC and Clang.
///
/// See <https://www.owasp.org/index.php/C-Based_Toolchain_Hardening_Cheat_Sheet>.
const GNU_COMMON_FLAGS: &[&str] = &[
    "-Werror",
    "-Wall",
    "-Wextra",
    "-Wconversion",
    "-Wcast-align",
    "-Wformat=2",
    "-Wformat-security",
    "-fno-common",
    "-Wmissing-declarations",
    "-Wstrict-overflow",
    "-Woverloaded-virtual",
    "-Wreorder",
    "-Wsign-promo",
    "-Wnon-virtual-dtor",
    "-fstack-protector-all",
];

/// Flags GCC only accepts for C sources but Clang accepts everywhere.
const PROTOTYPE_FLAGS: &[&str] = &["-Wmissing-prototypes", "-Wstrict-prototypes"];

/// Linker hardening, unavailable with the Apple linker.
const GNU_LINKER_FLAGS: &[&str] = &[
    "-Wl,-z,noexecstack",
    "-Wl,-z,now",
    "-Wl,-z,relro",
    "-Wl,-z,nodlopen",
    "-Wl,-z,nodump",
];

fn append_flag(cmake: &mut CMakeFile, variable: &str, flag: &str) {
    cmake.write_line(&format!("set({0} \"${{{0}}} {1}\")", variable, flag));
}

fn append_flags(cmake: &mut CMakeFile, variable: &str, flags: &[&str]) {
    for flag in flags {
        append_flag(cmake, variable, flag);
    }
}

impl CMakeFile {
    /// Emit the restrictive compiler flags section.
    pub fn set_restrictive_compiler_flags(&mut self) -> Result<()> {
        self.write_section_comment("set restrictive compiler flags");
        self.if_compiler_family(
            |cmake| {
                append_flags(cmake, "MK_COMMON_FLAGS", GNU_COMMON_FLAGS);
                cmake.conditional(
                    &Condition::ClangCompiler,
                    |cmake| {
                        append_flags(cmake, "MK_COMMON_FLAGS", PROTOTYPE_FLAGS);
                        Ok(())
                    },
                    Some(|cmake: &mut CMakeFile| {
                        append_flags(cmake, "MK_C_FLAGS", PROTOTYPE_FLAGS);
                        Ok(())
                    }),
                )?;
                cmake.conditional(
                    &Condition::GnuCompiler,
                    |cmake| {
                        append_flag(cmake, "MK_COMMON_FLAGS", "-Wtrampolines");
                        Ok(())
                    },
                    NO_ELSE,
                )?;
                cmake.conditional(
                    &Condition::NotApple,
                    |cmake| {
                        append_flags(cmake, "MK_LD_FLAGS", GNU_LINKER_FLAGS);
                        Ok(())
                    },
                    NO_ELSE,
                )?;
                cmake.write_line("add_definitions(-D_FORTIFY_SOURCE=2)");
                Ok(())
            },
            |cmake| {
                append_flags(cmake, "MK_COMMON_FLAGS", &["/WX", "/W4"]);
                append_flag(cmake, "MK_LD_FLAGS", "/WX");
                Ok(())
            },
        )?;
        self.write_line(
            "set(CMAKE_C_FLAGS \"${CMAKE_C_FLAGS} ${MK_COMMON_FLAGS} ${MK_C_FLAGS}\")",
        );
        self.write_line(
            "set(CMAKE_CXX_FLAGS \"${CMAKE_CXX_FLAGS} ${MK_COMMON_FLAGS} ${MK_CXX_FLAGS}\")",
        );
        self.write_line(
            "set(CMAKE_EXE_LINKER_FLAGS \"${CMAKE_EXE_LINKER_FLAGS} ${MK_LD_FLAGS}\")",
        );
        self.write_line(
            "set(CMAKE_SHARED_LINKER_FLAGS \"${CMAKE_SHARED_LINKER_FLAGS} ${MK_LD_FLAGS}\")",
        );
        self.conditional(
            &Condition::Windows,
            |cmake| {
                // NI_NUMERICSERV and WSAPoll
                cmake.write_line("add_definitions(-D_WIN32_WINNT=0x0600)");
                Ok(())
            },
            NO_ELSE,
        )
    }

    /// Apply the definitions, include directories and libraries accumulated
    /// by the dependency rules to every target declared afterwards.
    pub fn finalize_compiler(&mut self) {
        self.write_section_comment("finalize compiler");
        self.write_line("add_definitions(${CMAKE_REQUIRED_DEFINITIONS})");
        self.write_line("include_directories(${CMAKE_REQUIRED_INCLUDES})");
        self.write_line("link_libraries(${CMAKE_REQUIRED_LIBRARIES})");
    }
}
