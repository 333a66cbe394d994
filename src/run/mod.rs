//! Producing raw results by running the external benchmark launcher.

pub mod ideal;
