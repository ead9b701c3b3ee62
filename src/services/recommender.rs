//! Recommendation ranking over session history.
//!
//! Two independent rankers share one signal: cosine similarity.
//!
//! - `related_queries` fits a TF-IDF vector space over the session's past
//!   queries plus the current one and ranks the past queries against it.
//! - `similar_tracks` ranks previously seen tracks against the most recently
//!   fetched one using the five-dimensional audio-feature reduction.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::TrackFeatures;

/// Number of query suggestions returned per search pass
const QUERY_SUGGESTIONS: usize = 3;

/// Default number of track recommendations
pub const DEFAULT_TRACK_RECOMMENDATIONS: usize = 3;

/// A ranked track with its similarity score
#[derive(Debug, Clone, Serialize)]
pub struct TrackRecommendation {
    #[serde(flatten)]
    pub track: TrackFeatures,
    pub similarity: f64,
}

/// Ranks past queries by TF-IDF cosine similarity to the current query.
///
/// The current query is part of the fitted corpus but excluded from the
/// candidates only by exact string equality; near-duplicate phrasings remain
/// eligible. Ties keep original history order. Empty history yields an empty
/// list.
pub fn related_queries(current: &str, history: &[String]) -> Vec<String> {
    if history.is_empty() {
        return Vec::new();
    }

    // The fitted corpus is the union of past queries and the current one; a
    // current query that already sits in history must not count twice, or its
    // terms' document frequencies shift and the ranking changes.
    let current_doc = tokenize(current);
    let mut docs: Vec<Vec<String>> = history.iter().map(|q| tokenize(q)).collect();
    if !history.iter().any(|q| q == current) {
        docs.push(current_doc.clone());
    }

    let vocabulary = build_vocabulary(&docs);
    let idf = inverse_document_frequencies(&docs, &vocabulary);
    let current_vector = tfidf_vector(&current_doc, &vocabulary, &idf);

    let mut ranked: Vec<(usize, f64)> = history
        .iter()
        .enumerate()
        .filter(|(_, q)| q.as_str() != current)
        .map(|(i, _)| {
            let vector = tfidf_vector(&docs[i], &vocabulary, &idf);
            (i, cosine_similarity(&current_vector, &vector))
        })
        .collect();

    // Vec::sort_by is stable, so equal scores keep history order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .take(QUERY_SUGGESTIONS)
        .map(|(i, _)| history[i].clone())
        .collect()
}

/// Ranks the session's tracks against the most recently added one.
///
/// The reference entry itself is excluded by position, so an earlier track
/// with identical features can still appear. Empty collection yields an empty
/// list.
pub fn similar_tracks(features: &[TrackFeatures], k: usize) -> Vec<TrackRecommendation> {
    let Some((reference_index, reference)) = features.iter().enumerate().last() else {
        return Vec::new();
    };

    let reference_vector = reference.feature_vector();

    let mut ranked: Vec<(usize, f64)> = features
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != reference_index)
        .map(|(i, track)| {
            (
                i,
                cosine_similarity(&reference_vector, &track.feature_vector()),
            )
        })
        .collect();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .take(k)
        .map(|(i, similarity)| TrackRecommendation {
            track: features[i].clone(),
            similarity,
        })
        .collect()
}

/// Lowercased alphanumeric tokens
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn build_vocabulary(docs: &[Vec<String>]) -> HashMap<String, usize> {
    let mut vocabulary = HashMap::new();
    for doc in docs {
        for token in doc {
            let next_index = vocabulary.len();
            vocabulary.entry(token.clone()).or_insert(next_index);
        }
    }
    vocabulary
}

/// Smoothed IDF: ln((1 + n) / (1 + df)) + 1, so no term weight hits zero
fn inverse_document_frequencies(
    docs: &[Vec<String>],
    vocabulary: &HashMap<String, usize>,
) -> Vec<f64> {
    let n_docs = docs.len() as f64;
    let mut idf = vec![0.0; vocabulary.len()];

    for (token, &index) in vocabulary {
        let df = docs.iter().filter(|doc| doc.contains(token)).count() as f64;
        idf[index] = ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0;
    }

    idf
}

fn tfidf_vector(doc: &[String], vocabulary: &HashMap<String, usize>, idf: &[f64]) -> Vec<f64> {
    let mut vector = vec![0.0; vocabulary.len()];
    for token in doc {
        if let Some(&index) = vocabulary.get(token) {
            vector[index] += idf[index];
        }
    }
    vector
}

/// Normalized dot product; zero-magnitude vectors score 0.0
fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
