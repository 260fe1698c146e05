use serde::{Deserialize, Serialize};

/// Search request body for `POST /v1/jobs/search`.
#[derive(Debug, Clone, Serialize)]
pub struct JobSearchRequest {
    /// Match jobs whose description contains any of these patterns.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub job_description_pattern_or: Vec<String>,
    /// Only jobs posted on or after this date (YYYY-MM-DD).
    pub posted_at_gte: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_domain_or: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_num_employees_min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_num_employees_max: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_country_code_or: Option<Vec<String>>,
    pub limit: u32,
    pub order_by: Vec<OrderBy>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderBy {
    pub field: String,
    pub desc: bool,
}

impl JobSearchRequest {
    /// Keyword search over recent postings, newest first.
    pub fn keyword_search(patterns: Vec<String>, posted_after: &str, limit: u32) -> Self {
        Self {
            job_description_pattern_or: patterns,
            posted_at_gte: posted_after.to_string(),
            company_domain_or: None,
            company_num_employees_min: None,
            company_num_employees_max: None,
            job_country_code_or: None,
            limit,
            order_by: vec![OrderBy {
                field: "date_posted".to_string(),
                desc: true,
            }],
        }
    }

    /// Restrict the search to one company domain.
    pub fn for_domain(mut self, domain: &str) -> Self {
        self.company_domain_or = Some(vec![domain.to_string()]);
        self
    }

    pub fn employees(mut self, min: u32, max: u32) -> Self {
        self.company_num_employees_min = Some(min);
        self.company_num_employees_max = Some(max);
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobSearchResponse {
    #[serde(default)]
    pub data: Vec<JobPosting>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobPosting {
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub job_url: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub job_location: Option<String>,
    #[serde(default)]
    pub date_posted: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_domain: Option<String>,
    #[serde(default)]
    pub company_industry: Option<String>,
    #[serde(default)]
    pub company_country: Option<String>,
    #[serde(default)]
    pub company_num_employees: Option<u32>,
    #[serde(default)]
    pub company_linkedin_url: Option<String>,
}
