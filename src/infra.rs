use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use crew_trust::workflows::competency::{
    Answer, CompetencyDimension, CompetencyQuestion, InterviewId, InterviewRecord,
    OperationScope, RoleScope, ALL_VESSELS,
};
use crew_trust::workflows::stability::CandidateContract;
use crew_trust::workflows::trust::{CandidateId, CandidateProfile, RepositoryError};

#[derive(Debug, thiserror::Error)]
pub(crate) enum InputError {
    #[error("unable to read '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{path}' is not a valid interview document")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("'{path}' contains an invalid contract row")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("unable to stage input")]
    Repository(#[from] RepositoryError),
}

/// Candidate, interview and (optionally) question bank for one competency run.
#[derive(Debug, Deserialize)]
pub(crate) struct InterviewDocument {
    pub(crate) candidate: CandidateProfile,
    pub(crate) interview: InterviewInput,
    #[serde(default)]
    pub(crate) questions: Vec<CompetencyQuestion>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InterviewInput {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(crate) answers: Vec<Answer>,
}

impl InterviewDocument {
    /// Interviews without a completion time are treated as completed now.
    pub(crate) fn interview_record(&self, now: DateTime<Utc>) -> InterviewRecord {
        InterviewRecord {
            id: InterviewId(self.interview.id.clone()),
            candidate_id: self.candidate.id.clone(),
            completed_at: Some(self.interview.completed_at.unwrap_or(now)),
            answers: self.interview.answers.clone(),
        }
    }
}

pub(crate) fn load_interview(path: &Path) -> Result<InterviewDocument, InputError> {
    let raw = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// One generic question per dimension, used when the document carries no question bank.
pub(crate) fn generic_questions() -> Vec<CompetencyQuestion> {
    CompetencyDimension::ALL
        .into_iter()
        .map(|dimension| CompetencyQuestion {
            id: format!("generic-{}", dimension.code().to_ascii_lowercase()),
            dimension,
            role_scope: RoleScope::All,
            vessel_scope: ALL_VESSELS.to_string(),
            operation_scope: OperationScope::Both,
            difficulty: 1,
            prompt: format!("Describe a situation that shows your {}.", dimension.label().to_lowercase()),
            active: true,
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct ContractRow {
    #[serde(deserialize_with = "deserialize_date")]
    start_date: NaiveDate,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    end_date: Option<NaiveDate>,
    #[serde(default)]
    vessel_type: String,
    #[serde(default)]
    rank: String,
    #[serde(default)]
    company: String,
}

impl From<ContractRow> for CandidateContract {
    fn from(row: ContractRow) -> Self {
        CandidateContract {
            start_date: row.start_date,
            end_date: row.end_date,
            vessel_type: row.vessel_type,
            rank: row.rank,
            company: row.company,
        }
    }
}

/// Read a contract CSV with `start_date,end_date,vessel_type,rank,company` columns.
pub(crate) fn load_contracts(path: &Path) -> Result<Vec<CandidateContract>, InputError> {
    let file = File::open(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut contracts = Vec::new();
    for row in reader.deserialize::<ContractRow>() {
        let row = row.map_err(|source| InputError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        contracts.push(CandidateContract::from(row));
    }
    contracts.sort_by_key(|contract| contract.start_date);
    Ok(contracts)
}

/// Candidate record synthesised from a bare contract history.
pub(crate) fn candidate_from_contracts(
    id: &CandidateId,
    contracts: &[CandidateContract],
    fleet_type: Option<String>,
) -> CandidateProfile {
    let rank = contracts
        .iter()
        .rev()
        .map(|contract| contract.rank.trim())
        .find(|rank| !rank.is_empty())
        .map(str::to_string);
    CandidateProfile {
        id: id.clone(),
        full_name: String::new(),
        rank,
        fleet_type,
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("crew-trust-{}-{name}", std::process::id()));
        let mut file = File::create(&path).expect("create scratch file");
        file.write_all(contents.as_bytes()).expect("write scratch file");
        path
    }

    #[test]
    fn contract_csv_accepts_open_contracts_and_sorts() {
        let path = scratch_file(
            "contracts.csv",
            "start_date,end_date,vessel_type,rank,company\n\
             2024-06-01,,Tanker,Chief Officer,Nordic\n\
             2023-01-15, 2023-07-20 ,Bulk,Second Officer,Blue Anchor\n",
        );
        let contracts = load_contracts(&path).expect("valid csv");
        fs::remove_file(&path).ok();

        assert_eq!(contracts.len(), 2);
        assert_eq!(contracts[0].company, "Blue Anchor");
        assert_eq!(
            contracts[0].end_date,
            Some(NaiveDate::from_ymd_opt(2023, 7, 20).expect("valid"))
        );
        assert!(contracts[1].end_date.is_none());

        let profile = candidate_from_contracts(&CandidateId::new("c-1"), &contracts, None);
        assert_eq!(profile.rank.as_deref(), Some("Chief Officer"));
    }

    #[test]
    fn malformed_dates_are_reported_with_the_path() {
        let path = scratch_file("broken.csv", "start_date,end_date\n01/02/2024,\n");
        let err = load_contracts(&path).expect_err("bad date");
        fs::remove_file(&path).ok();
        assert!(matches!(err, InputError::Csv { .. }));
        assert!(err.to_string().contains("broken.csv"));
        let cause = std::error::Error::source(&err).expect("csv cause");
        assert!(cause.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn interview_document_defaults() {
        let path = scratch_file(
            "interview.json",
            r#"{
                "candidate": { "id": "cand-9", "rank": "Bosun" },
                "interview": {
                    "id": "int-9",
                    "answers": [{ "dimension_code": "COMMUNICATION", "text": "I reported it." }]
                }
            }"#,
        );
        let document = load_interview(&path).expect("valid document");
        fs::remove_file(&path).ok();

        assert!(document.questions.is_empty());
        let now = Utc::now();
        let record = document.interview_record(now);
        assert_eq!(record.completed_at, Some(now));
        assert_eq!(record.candidate_id, CandidateId::new("cand-9"));
        assert_eq!(generic_questions().len(), CompetencyDimension::ALL.len());
    }
}
