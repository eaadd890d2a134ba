// End-to-end tests for the synthesis pipeline
//
// Backends are replaced by an in-process mock that returns a constant tone per language,
// so every test runs offline and output audio can be checked sample by sample. The backend
// tests point real clients at unreachable endpoints to exercise error translation.

mod helpers;
mod test_backends;
mod test_export;
mod test_pipeline;
