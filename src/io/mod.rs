//! Input and output collaborators of the pipeline : graph files, bundles, libsvm records, feature maps.

/// graphs from csv files
pub mod csv;

/// directories of graph files and their chunks
pub mod bundle;

/// libsvm records writer, reader and stacking
pub mod libsvm;

/// feature map json dump
pub mod fmap;
