//! Remote operation catalogue
//!
//! Every document operation the service offers is submitted the same way:
//! a JSON POST to an endpoint under `/api/documents/` that answers with a
//! task ID. This module names those endpoints and knows how many input
//! documents each one takes. Payload fields beyond the document references
//! are passed through untouched.

use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::dto::document::DocumentRef;

/// How many uploaded documents an operation consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentArity {
    /// Works from other inputs (e.g. a URL)
    None,
    /// Exactly one document, sent as `documentId`
    One,
    /// Exactly two documents, sent as `document1` / `document2`
    Pair,
    /// Two or more documents, sent as a `documents` array
    Many,
}

/// Errors building an operation payload
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("{operation} expects {expected}, got {actual} document(s)")]
    DocumentCount {
        operation: Operation,
        expected: &'static str,
        actual: usize,
    },

    #[error("unknown operation: {0}")]
    UnknownOperation(String),
}

macro_rules! operations {
    ($( $variant:ident => ($name:literal, $path:literal, $arity:ident) ),+ $(,)?) => {
        /// A document operation exposed by the remote service
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Operation {
            $( $variant, )+
        }

        impl Operation {
            /// All operations, in catalogue order
            pub const ALL: &'static [Operation] = &[ $( Operation::$variant, )+ ];

            /// Short kebab-case name
            pub fn name(self) -> &'static str {
                match self {
                    $( Operation::$variant => $name, )+
                }
            }

            /// Endpoint path, relative to the service base URL
            pub fn path(self) -> &'static str {
                match self {
                    $( Operation::$variant => $path, )+
                }
            }

            /// Number of input documents the endpoint expects
            pub fn arity(self) -> DocumentArity {
                match self {
                    $( Operation::$variant => DocumentArity::$arity, )+
                }
            }
        }
    };
}

operations! {
    PdfFromWord => ("pdf-from-word", "/api/documents/create/pdf-from-word", One),
    PdfFromExcel => ("pdf-from-excel", "/api/documents/create/pdf-from-excel", One),
    PdfFromPpt => ("pdf-from-ppt", "/api/documents/create/pdf-from-ppt", One),
    PdfFromHtml => ("pdf-from-html", "/api/documents/create/pdf-from-html", One),
    PdfFromUrl => ("pdf-from-url", "/api/documents/create/pdf-from-url", None),
    PdfFromText => ("pdf-from-text", "/api/documents/create/pdf-from-text", One),
    PdfFromImage => ("pdf-from-image", "/api/documents/create/pdf-from-image", One),
    PdfToWord => ("pdf-to-word", "/api/documents/convert/pdf-to-word", One),
    PdfToExcel => ("pdf-to-excel", "/api/documents/convert/pdf-to-excel", One),
    PdfToPpt => ("pdf-to-ppt", "/api/documents/convert/pdf-to-ppt", One),
    PdfToHtml => ("pdf-to-html", "/api/documents/convert/pdf-to-html", One),
    PdfToText => ("pdf-to-text", "/api/documents/convert/pdf-to-text", One),
    PdfToImage => ("pdf-to-image", "/api/documents/convert/pdf-to-image", One),
    PdfCombine => ("pdf-combine", "/api/documents/enhance/pdf-combine", Many),
    PdfWatermark => ("pdf-watermark", "/api/documents/enhance/pdf-watermark", One),
    PdfProtect => ("pdf-protect", "/api/documents/security/pdf-protect", One),
    PdfRemovePassword => ("pdf-remove-password", "/api/documents/security/pdf-remove-password", One),
    PdfSplit => ("pdf-split", "/api/documents/modify/pdf-split", One),
    PdfExtract => ("pdf-extract", "/api/documents/modify/pdf-extract", One),
    PdfFlatten => ("pdf-flatten", "/api/documents/modify/pdf-flatten", One),
    PdfCompress => ("pdf-compress", "/api/documents/modify/pdf-compress", One),
    PdfManipulate => ("pdf-manipulate", "/api/documents/modify/pdf-manipulate", One),
    PdfLinearize => ("pdf-linearize", "/api/documents/optimize/pdf-linearize", One),
    GetPdfProperties => ("get-pdf-properties", "/api/documents/analyze/get-pdf-properties", One),
    PdfCompare => ("pdf-compare", "/api/documents/analyze/pdf-compare", Pair),
    PdfOcr => ("pdf-ocr", "/api/documents/analyze/pdf-ocr", One),
    PdfStructuralAnalysis => ("pdf-structural-analysis", "/api/documents/analyze/pdf-structural-analysis", One),
    ExportPdfFormData => ("export-pdf-form-data", "/api/documents/forms/export-pdf-form-data", One),
    ImportPdfFormData => ("import-pdf-form-data", "/api/documents/forms/import-pdf-form-data", One),
}

impl Operation {
    /// Build the JSON body for this operation
    ///
    /// Document references are placed according to the operation's arity;
    /// `params` are merged in at the top level and never overwrite them.
    pub fn build_payload(
        self,
        documents: &[DocumentRef],
        params: Map<String, JsonValue>,
    ) -> Result<JsonValue, PayloadError> {
        let count_error = |expected| PayloadError::DocumentCount {
            operation: self,
            expected,
            actual: documents.len(),
        };

        let mut body = params;
        match self.arity() {
            DocumentArity::None => {
                if !documents.is_empty() {
                    return Err(count_error("no documents"));
                }
            }
            DocumentArity::One => {
                let [doc] = documents else {
                    return Err(count_error("exactly one document"));
                };
                body.insert("documentId".into(), doc.document_id.clone().into());
                if let Some(password) = &doc.password {
                    body.insert("password".into(), password.clone().into());
                }
            }
            DocumentArity::Pair => {
                let [first, second] = documents else {
                    return Err(count_error("exactly two documents"));
                };
                body.insert("document1".into(), to_json(first));
                body.insert("document2".into(), to_json(second));
            }
            DocumentArity::Many => {
                if documents.len() < 2 {
                    return Err(count_error("at least two documents"));
                }
                let refs = documents.iter().map(to_json).collect();
                body.insert("documents".into(), JsonValue::Array(refs));
            }
        }

        Ok(JsonValue::Object(body))
    }
}

fn to_json(doc: &DocumentRef) -> JsonValue {
    serde_json::to_value(doc).unwrap_or(JsonValue::Null)
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', "-").to_ascii_lowercase();
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.name() == wanted)
            .ok_or_else(|| PayloadError::UnknownOperation(s.to_string()))
    }
}
