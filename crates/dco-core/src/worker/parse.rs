//! Decode and validate a worker's JSON body against the request it answers.

use super::{ChunkError, ChunkRequest, WorkerResponse};

/// Parse `body` as a `WorkerResponse` and check it is consistent:
/// `verb_count` equals the category sum, the file name is echoed, the
/// echoed range lies inside the requested one and the elapsed time is a
/// finite non-negative number.
pub fn parse_response(body: &[u8], request: &ChunkRequest) -> Result<WorkerResponse, ChunkError> {
    let response: WorkerResponse =
        serde_json::from_slice(body).map_err(|e| ChunkError::Malformed(e.to_string()))?;

    let sum = response.detailed_counts.sum();
    if response.verb_count != sum {
        return Err(ChunkError::Malformed(format!(
            "verb_count {} does not match category sum {}",
            response.verb_count, sum
        )));
    }
    if response.file_name != request.file_name {
        return Err(ChunkError::Malformed(format!(
            "file_name {:?} does not match request {:?}",
            response.file_name, request.file_name
        )));
    }
    let chunk = &request.chunk;
    if response.start != chunk.start || response.end > chunk.end || response.start >= response.end {
        return Err(ChunkError::Malformed(format!(
            "range [{}, {}) does not match request [{}, {})",
            response.start, response.end, chunk.start, chunk.end
        )));
    }
    if !response.execution_time_seconds.is_finite() || response.execution_time_seconds < 0.0 {
        return Err(ChunkError::Malformed(format!(
            "execution_time_seconds {} is not a non-negative number",
            response.execution_time_seconds
        )));
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Chunk;

    fn request(start: u64, end: u64) -> ChunkRequest {
        ChunkRequest {
            file_name: "spy.txt".to_string(),
            chunk: Chunk { id: 1, start, end },
        }
    }

    fn body(verb_count: u64, start: u64, end: u64) -> String {
        format!(
            r#"{{"verb_count":{verb_count},"detailed_counts":{{"past":5,"present":5,"future":0,"base":0,"gerund":0,"participle":0}},"file_name":"spy.txt","start":{start},"end":{end},"total_file_size":250,"execution_time_seconds":0.25}}"#
        )
    }

    #[test]
    fn valid_response_parses() {
        let r = parse_response(body(10, 100, 200).as_bytes(), &request(100, 200)).unwrap();
        assert_eq!(r.verb_count, 10);
        assert_eq!(r.detailed_counts.past, 5);
        assert_eq!(r.total_file_size, 250);
    }

    #[test]
    fn clamped_end_accepted() {
        // Worker clamps `end` to the resource size it sees.
        assert!(parse_response(body(10, 200, 240).as_bytes(), &request(200, 250)).is_ok());
    }

    #[test]
    fn verb_count_mismatch_is_malformed() {
        let err = parse_response(body(11, 100, 200).as_bytes(), &request(100, 200)).unwrap_err();
        assert!(matches!(err, ChunkError::Malformed(_)));
    }

    #[test]
    fn range_outside_request_is_malformed() {
        let err = parse_response(body(10, 0, 100).as_bytes(), &request(100, 200)).unwrap_err();
        assert!(matches!(err, ChunkError::Malformed(_)));
    }

    #[test]
    fn wrong_file_name_is_malformed() {
        let mut req = request(100, 200);
        req.file_name = "other.txt".to_string();
        let err = parse_response(body(10, 100, 200).as_bytes(), &req).unwrap_err();
        assert!(matches!(err, ChunkError::Malformed(_)));
    }

    #[test]
    fn not_json_is_malformed() {
        let err = parse_response(b"Internal error", &request(0, 100)).unwrap_err();
        assert!(matches!(err, ChunkError::Malformed(_)));
    }

    #[test]
    fn extra_category_is_malformed() {
        let json = r#"{"verb_count":1,"detailed_counts":{"past":1,"present":0,"future":0,"base":0,"gerund":0,"participle":0,"modal":0},"file_name":"spy.txt","start":0,"end":100,"total_file_size":100,"execution_time_seconds":0.1}"#;
        let err = parse_response(json.as_bytes(), &request(0, 100)).unwrap_err();
        assert!(matches!(err, ChunkError::Malformed(_)));
    }

    #[test]
    fn negative_time_is_malformed() {
        let json = r#"{"verb_count":0,"detailed_counts":{"past":0,"present":0,"future":0,"base":0,"gerund":0,"participle":0},"file_name":"spy.txt","start":0,"end":100,"total_file_size":100,"execution_time_seconds":-1.0}"#;
        let err = parse_response(json.as_bytes(), &request(0, 100)).unwrap_err();
        assert!(matches!(err, ChunkError::Malformed(_)));
    }
}
