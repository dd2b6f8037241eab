use super::{Object, EVERYONE};
use crate::{
    pipeline::Listed,
    status::{post_status, PostStatus},
    time,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Post,
    Vote,
    Form,
    Poll,
}

impl PostKind {
    /// Votes, forms and polls collect responses, so they must close.
    pub fn requires_end_date(self) -> bool {
        match self {
            Self::Post => false,
            Self::Vote | Self::Form | Self::Poll => true,
        }
    }
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Post => "post",
            Self::Vote => "vote",
            Self::Form => "form",
            Self::Poll => "poll",
        })
    }
}

/// One question with a fixed set of answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ballot {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormQuestion {
    pub question: String,
    pub input_type: String,
    #[serde(default, rename = "maxSel", skip_serializing_if = "Option::is_none")]
    pub max_selections: Option<u32>,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Kind-specific content. Exactly one shape exists per post; switching
/// kinds therefore cannot leave stale payloads behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostBody {
    Plain { markdown: String },
    Vote(Ballot),
    Form(Vec<FormQuestion>),
    Poll(Ballot),
}

impl PostBody {
    pub fn kind(&self) -> PostKind {
        match self {
            Self::Plain { .. } => PostKind::Post,
            Self::Vote(_) => PostKind::Vote,
            Self::Form(_) => PostKind::Form,
            Self::Poll(_) => PostKind::Poll,
        }
    }
}

/// A content item inside an event.
///
/// Invariants held by construction: the body matches the kind, a public
/// post has an empty assignment, and an `everyone` assignment stands
/// alone. The wire's flat shape is bridged through [`RawPost`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPost", into = "RawPost")]
pub struct Post {
    pub id: String,
    pub event: String,
    pub title: String,
    pub description: String,
    pub assign_to: Vec<String>,
    pub public: bool,
    pub post_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub author: String,
    pub body: PostBody,
}

impl Post {
    pub fn kind(&self) -> PostKind {
        self.body.kind()
    }

    pub fn status(&self, now: DateTime<Utc>) -> PostStatus {
        post_status(now, self.end_date)
    }

    /// The coarse "how long ago" stamp shown on post cards.
    pub fn posted(&self, now: DateTime<Utc>) -> time::RelativeStamp {
        time::RelativeStamp::new(now, self.post_date)
    }

    /// Assigned to everyone, either explicitly or via the sentinel.
    pub fn assigned_to_all(&self) -> bool {
        self.assign_to.iter().any(|it| it == EVERYONE)
    }
}

impl Object for Post {
    const QUERY_PATH: &'static str = "posts";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Listed for Post {
    fn display_name(&self) -> &str {
        &self.title
    }

    fn sort_date(&self) -> DateTime<Utc> {
        self.post_date
    }
}

/// What the store actually sends: a kind tag plus one optional payload
/// field per kind. Dates travel as RFC 3339 text in the regional offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPost {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "eventID", default)]
    pub event: String,
    pub kind: PostKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assign_to: Vec<String>,
    #[serde(default)]
    pub public: bool,
    pub post_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_questions: Option<Ballot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_questions: Option<Vec<FormQuestion>>,
}

impl TryFrom<RawPost> for Post {
    type Error = String;

    fn try_from(raw: RawPost) -> Result<Self, Self::Error> {
        let RawPost {
            id,
            event,
            kind,
            title,
            description,
            mut assign_to,
            public,
            post_date,
            end_date,
            author,
            markdown,
            vote_questions,
            form_questions,
        } = raw;

        let stray = |field: &str| format!("{kind} post carries a stray {field} payload");
        let body = match kind {
            PostKind::Post => {
                if vote_questions.is_some() {
                    return Err(stray("voteQuestions"));
                }
                if form_questions.is_some() {
                    return Err(stray("formQuestions"));
                }
                PostBody::Plain {
                    markdown: markdown.ok_or("post is missing its markdown payload")?,
                }
            }
            PostKind::Vote | PostKind::Poll => {
                if markdown.is_some() {
                    return Err(stray("markdown"));
                }
                if form_questions.is_some() {
                    return Err(stray("formQuestions"));
                }
                let ballot = vote_questions.ok_or_else(|| format!("{kind} is missing its ballot"))?;
                if kind == PostKind::Vote {
                    PostBody::Vote(ballot)
                } else {
                    PostBody::Poll(ballot)
                }
            }
            PostKind::Form => {
                if markdown.is_some() {
                    return Err(stray("markdown"));
                }
                if vote_questions.is_some() {
                    return Err(stray("voteQuestions"));
                }
                PostBody::Form(form_questions.ok_or("form is missing its questions")?)
            }
        };

        if public {
            assign_to.clear();
        }

        Ok(Post {
            id,
            event,
            title,
            description,
            assign_to,
            public,
            post_date: time::parse_instant(&post_date)?,
            end_date: end_date.as_deref().map(time::parse_instant).transpose()?,
            author,
            body,
        })
    }
}

impl From<Post> for RawPost {
    fn from(post: Post) -> Self {
        let kind = post.kind();
        let (markdown, vote_questions, form_questions) = match post.body {
            PostBody::Plain { markdown } => (Some(markdown), None, None),
            PostBody::Vote(ballot) | PostBody::Poll(ballot) => (None, Some(ballot), None),
            PostBody::Form(questions) => (None, None, Some(questions)),
        };
        RawPost {
            id: post.id,
            event: post.event,
            kind,
            title: post.title,
            description: post.description,
            assign_to: post.assign_to,
            public: post.public,
            post_date: time::to_regional(post.post_date).to_rfc3339(),
            end_date: post.end_date.map(|it| time::to_regional(it).to_rfc3339()),
            author: post.author,
            markdown,
            vote_questions,
            form_questions,
        }
    }
}

/// A post being authored or edited, before the store has assigned it an
/// identifier or a publication instant.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub description: String,
    pub assign_to: Vec<String>,
    pub public: bool,
    pub end_date: Option<DateTime<Utc>>,
    pub author: String,
    pub body: PostBody,
}

impl PostDraft {
    pub fn kind(&self) -> PostKind {
        self.body.kind()
    }
}
