//! Domain entities for the skill debug relay.
//!
//! This module contains pure lookup logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain**.  Domain code has **no** imports from
//! network libraries or the process environment, and can be compiled and
//! tested on any platform without any external setup.
//!
//! The only domain concept the relay needs is the region table: the assistant
//! service runs one debug relay per geographic region, and a developer picks
//! which one to attach to with a short region code.

/// Region code to relay hostname table.
///
/// See [`region::RegionTable`] for the main type.
pub mod region;
