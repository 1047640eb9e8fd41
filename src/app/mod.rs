// Application layer: renderings of a computed deadline for people and calendars.

pub mod ics;
pub mod report;
