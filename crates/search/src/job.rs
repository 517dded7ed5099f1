//! Job records and their search-ready projection.

use crate::normalize::{normalize_text, MetroTable};
use serde::{Deserialize, Serialize};

/// Anything with the three searchable job fields.
pub trait JobRecord {
    /// Job title
    fn position(&self) -> &str;
    /// Hiring company
    fn company(&self) -> &str;
    /// Free-text location, if any
    fn location(&self) -> Option<&str>;
}

/// A job listing as supplied by the data layer.
///
/// Fields other than the three searchable ones are kept verbatim in `extra`
/// so the projection round-trips the whole record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawJob {
    /// Job title
    #[serde(default)]
    pub position: String,
    /// Hiring company
    #[serde(default)]
    pub company: String,
    /// Free-text location
    #[serde(default)]
    pub location: Option<String>,
    /// Any other fields on the record
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RawJob {
    /// Creates a job with no extra fields.
    pub fn new(
        position: impl Into<String>,
        company: impl Into<String>,
        location: Option<&str>,
    ) -> Self {
        Self {
            position: position.into(),
            company: company.into(),
            location: location.map(String::from),
            extra: serde_json::Map::new(),
        }
    }
}

impl JobRecord for RawJob {
    fn position(&self) -> &str {
        &self.position
    }

    fn company(&self) -> &str {
        &self.company
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

/// A job plus its normalized search fields.
///
/// Serializes as the original record with `positionN`, `companyN` and
/// `locationN` added alongside its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedJob<J> {
    /// The untouched source record
    #[serde(flatten)]
    pub job: J,
    /// Normalized position
    #[serde(rename = "positionN")]
    pub position_n: String,
    /// Normalized company
    #[serde(rename = "companyN")]
    pub company_n: String,
    /// Canonical location bucket
    #[serde(rename = "locationN")]
    pub location_n: String,
}

impl<J> NormalizedJob<J> {
    /// Normalized value of a searchable field.
    pub fn field(&self, field: JobField) -> &str {
        match field {
            JobField::Position => &self.position_n,
            JobField::Company => &self.company_n,
            JobField::Location => &self.location_n,
        }
    }
}

/// The searchable fields of a projected job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobField {
    /// `positionN`
    Position,
    /// `companyN`
    Company,
    /// `locationN`
    Location,
}

impl JobField {
    /// All fields, in weight order.
    pub const ALL: [JobField; 3] = [JobField::Position, JobField::Company, JobField::Location];

    /// Serialized key of the normalized field.
    pub fn key(&self) -> &'static str {
        match self {
            JobField::Position => "positionN",
            JobField::Company => "companyN",
            JobField::Location => "locationN",
        }
    }
}

/// Project a job using the built-in metro table.
///
/// # Example
/// ```
/// use jobboard_search::{normalize_job, RawJob};
///
/// let job = RawJob::new("Engineer", "Acme", Some("NYC"));
/// let projected = normalize_job(&job);
///
/// assert_eq!(projected.position_n, "engineer");
/// assert_eq!(projected.location_n, "new york");
/// assert_eq!(projected.job, job);
/// ```
pub fn normalize_job<J: JobRecord + Clone>(job: &J) -> NormalizedJob<J> {
    normalize_job_with(job, MetroTable::builtin())
}

/// Project a job using a caller supplied metro table.
pub fn normalize_job_with<J: JobRecord + Clone>(job: &J, metros: &MetroTable) -> NormalizedJob<J> {
    NormalizedJob {
        position_n: normalize_text(Some(job.position())),
        company_n: normalize_text(Some(job.company())),
        location_n: metros.canonicalize(job.location()),
        job: job.clone(),
    }
}

/// Project a batch of jobs, in parallel when the `parallel` feature is on.
pub fn normalize_jobs<J>(jobs: &[J], metros: &MetroTable) -> Vec<NormalizedJob<J>>
where
    J: JobRecord + Clone + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        jobs.par_iter()
            .map(|job| normalize_job_with(job, metros))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        jobs.iter()
            .map(|job| normalize_job_with(job, metros))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_job_fields() {
        let job = RawJob::new("Engineer", "Acme", Some("NYC"));
        let projected = normalize_job(&job);

        assert_eq!(projected.position_n, "engineer");
        assert_eq!(projected.company_n, "acme");
        assert_eq!(projected.location_n, "new york");
        assert_eq!(projected.job.position, "Engineer");
        assert_eq!(projected.job.company, "Acme");
        assert_eq!(projected.job.location.as_deref(), Some("NYC"));
    }

    #[test]
    fn test_normalize_job_missing_location() {
        let job = RawJob::new(" Designer ", "Globex", None);
        let projected = normalize_job(&job);
        assert_eq!(projected.position_n, "designer");
        assert_eq!(projected.location_n, "");
    }

    #[test]
    fn test_serialized_shape_keeps_extra_fields() {
        let job: RawJob = serde_json::from_value(json!({
            "id": 42,
            "position": "Engineer",
            "company": "Acme",
            "location": "Remote",
            "salary": "100k"
        }))
        .unwrap();

        let value = serde_json::to_value(normalize_job(&job)).unwrap();
        assert_eq!(value["id"], 42);
        assert_eq!(value["salary"], "100k");
        assert_eq!(value["position"], "Engineer");
        assert_eq!(value["positionN"], "engineer");
        assert_eq!(value["companyN"], "acme");
        assert_eq!(value["locationN"], "remote");
    }

    #[test]
    fn test_null_location_deserializes() {
        let job: RawJob = serde_json::from_value(json!({
            "position": "Engineer",
            "company": "Acme",
            "location": null
        }))
        .unwrap();
        assert!(job.location.is_none());
        assert!(job.extra.is_empty());
    }

    #[test]
    fn test_custom_record_type() {
        #[derive(Clone)]
        struct Listing {
            title: &'static str,
            org: &'static str,
        }

        impl JobRecord for Listing {
            fn position(&self) -> &str {
                self.title
            }
            fn company(&self) -> &str {
                self.org
            }
            fn location(&self) -> Option<&str> {
                Some("Mountain View")
            }
        }

        let projected = normalize_job(&Listing { title: "SRE", org: "Initech" });
        assert_eq!(projected.position_n, "sre");
        assert_eq!(projected.location_n, "san francisco");
        assert_eq!(projected.field(JobField::Company), "initech");
    }

    #[test]
    fn test_normalize_jobs_batch_preserves_order() {
        let jobs = vec![
            RawJob::new("A", "X", Some("Toronto")),
            RawJob::new("B", "Y", Some("Austin")),
            RawJob::new("C", "Z", None),
        ];
        let projected = normalize_jobs(&jobs, MetroTable::builtin());

        let positions: Vec<_> = projected.iter().map(|j| j.position_n.as_str()).collect();
        assert_eq!(positions, ["a", "b", "c"]);
        assert_eq!(projected[0].location_n, "toronto");
        assert_eq!(projected[1].location_n, "austin");
    }
}
