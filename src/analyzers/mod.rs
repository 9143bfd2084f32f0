//! Delay join and aggregation.
//!
//! Observations are grouped per station pair, matched against route
//! patterns and expanded into colored map segments, then reduced into a
//! network-wide summary that can be published locally or to S3.

pub mod aggregate;
pub mod analyzer;
pub mod grade;
pub mod matcher;
pub mod normalize;
pub mod summary;
pub mod synthesize;
pub mod types;
pub mod utility;
pub mod writetos3;
