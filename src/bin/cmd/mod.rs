// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod export;
mod inspect;
mod merge;
mod record;
mod replay;

pub use export::ExportCmd;
pub use inspect::InspectCmd;
pub use merge::MergeCmd;
pub use record::RecordCmd;
pub use replay::ReplayCmd;
