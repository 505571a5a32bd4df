// Reference scoring service: the server side of the upload contract.
// Reads resumes, extracts a profile per candidate, scores it against the
// uploaded criteria and returns the ranked shortlist.

pub mod experience;
pub mod extract;
pub mod form;
pub mod handlers;
pub mod scoring;
