// ABOUTME: Field extraction module combining structural lookup and numeric conversion.
// ABOUTME: Re-exports the select and convert submodules used by every game parser.

pub mod convert;
pub mod select;
