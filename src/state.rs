#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanningStage {
    FindingFirstBoundary,
    ReadingParts,
    Eof,
}
