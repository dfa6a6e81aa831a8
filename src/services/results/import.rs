//! 成绩 CSV 导入
//!
//! 文件列：`admission_number,score[,remarks]`，表头大小写不敏感。
//! 学号在考试所属学校内解析，之后与成绩上传走同一套校验和写入。

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::StreamExt;
use std::collections::{HashMap, HashSet};
use std::io::Cursor;

use super::{ResultService, commit_rows, load_write_context};
use crate::models::{
    ApiResponse, ErrorCode,
    results::{entities::RowError, requests::ImportResultsQuery},
};
use crate::respond_on_err;
use crate::services::{current_user, storage_error};

const MAX_IMPORT_ROWS: usize = 1000;
const MAX_IMPORT_BYTES: usize = 2 * 1024 * 1024;

/// 导入解析错误
#[derive(Debug, PartialEq)]
enum ImportParseError {
    MissingColumn(String),
    ParseFailed(String),
}

impl ImportParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingColumn(_) => ErrorCode::ImportFileMissingColumn,
            Self::ParseFailed(_) => ErrorCode::ImportFileParseFailed,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::MissingColumn(col) => format!("Missing required column: {col}"),
            Self::ParseFailed(msg) => msg.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ImportRow {
    row_num: usize,
    admission_number: String,
    score: String,
    remarks: Option<String>,
}

pub async fn import_results(
    service: &ResultService,
    request: &HttpRequest,
    query: ImportResultsQuery,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let storage = respond_on_err!(service.get_storage(request));
    let user = respond_on_err!(current_user(request));

    let file_bytes = match read_file_from_multipart(&mut payload).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ImportFileParseFailed,
                format!("Failed to read upload: {e}"),
            )));
        }
    };

    let rows = match parse_csv(&file_bytes) {
        Ok(rows) => rows,
        Err(e) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(e.error_code(), e.message())));
        }
    };

    if rows.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ImportFileDataInvalid,
            "The file contains no data rows",
        )));
    }
    if rows.len() > MAX_IMPORT_ROWS {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ImportFileDataInvalid,
            format!("At most {MAX_IMPORT_ROWS} rows can be imported at once"),
        )));
    }

    let ctx = respond_on_err!(
        load_write_context(&storage, &user, query.examination_id, query.subject_id).await
    );

    // 学号 -> 学生
    let students: HashMap<String, _> = match storage
        .list_students_by_school(ctx.exam.school_id)
        .await
    {
        Ok(students) => students
            .into_iter()
            .map(|s| (s.admission_number.clone(), s))
            .collect(),
        Err(e) => {
            return Ok(storage_error(
                e,
                ErrorCode::StudentNotFound,
                "Failed to load students",
            ));
        }
    };

    let total = rows.len();
    let mut seen = HashSet::new();
    let mut upserts = Vec::new();
    let mut errors: Vec<RowError> = Vec::new();

    for row in rows {
        if row.admission_number.is_empty() {
            errors.push(RowError::new(
                row.row_num,
                "admission_number",
                "Admission number is empty",
            ));
            continue;
        }
        let score = match row.score.parse::<f64>() {
            Ok(score) => score,
            Err(_) => {
                errors.push(RowError::new(
                    row.row_num,
                    "score",
                    format!("Invalid score '{}'", row.score),
                ));
                continue;
            }
        };
        let Some(student) = students.get(&row.admission_number) else {
            errors.push(RowError::new(
                row.row_num,
                "admission_number",
                format!("Unknown admission number '{}'", row.admission_number),
            ));
            continue;
        };
        if !seen.insert(student.id) {
            errors.push(RowError::new(
                row.row_num,
                "admission_number",
                "Duplicate student in file",
            ));
            continue;
        }
        if let Err(rejection) = ctx.check_row(student, score) {
            errors.push(rejection.into_row_error(row.row_num));
            continue;
        }

        upserts.push(ctx.upsert_row(student.id, score, row.remarks, user.id));
    }

    tracing::info!(
        "User {} imported {} of {} result rows for examination {} subject {}",
        user.id,
        upserts.len(),
        total,
        ctx.exam.id,
        ctx.subject.id
    );

    commit_rows(&storage, total, upserts, errors).await
}

async fn read_file_from_multipart(payload: &mut Multipart) -> Result<Vec<u8>, String> {
    let mut file_bytes = Vec::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| format!("failed to read field: {e}"))?;

        if field.name().is_some_and(|n| n == "file") {
            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| format!("failed to read data: {e}"))?;
                if file_bytes.len() + data.len() > MAX_IMPORT_BYTES {
                    return Err("file is too large".to_string());
                }
                file_bytes.extend_from_slice(&data);
            }
        }
    }

    if file_bytes.is_empty() {
        return Err("no file field found".to_string());
    }

    Ok(file_bytes)
}

// 记录在文件中的实际行号（从 1 开始）
//
// csv 记录的位置取自上一条记录结束处，之后被跳过的空行需要补上
fn record_line(data: &[u8], record: &csv::StringRecord) -> usize {
    let Some(pos) = record.position() else {
        return 0;
    };
    let mut line = pos.line() as usize;
    let start = pos.byte() as usize;
    for byte in data.iter().skip(start) {
        match byte {
            b'\n' => line += 1,
            b'\r' => {}
            _ => break,
        }
    }
    line
}

fn parse_csv(data: &[u8]) -> Result<Vec<ImportRow>, ImportParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(data));

    let headers = rdr
        .headers()
        .map_err(|e| ImportParseError::ParseFailed(format!("Failed to read header: {e}")))?;
    let header_map: HashMap<_, _> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim_start_matches('\u{feff}').to_lowercase(), i))
        .collect();

    let admission_idx = *header_map
        .get("admission_number")
        .ok_or_else(|| ImportParseError::MissingColumn("admission_number".to_string()))?;
    let score_idx = *header_map
        .get("score")
        .ok_or_else(|| ImportParseError::MissingColumn("score".to_string()))?;
    let remarks_idx = header_map.get("remarks").copied();

    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| {
            let line = e.position().map_or(0, |p| p.line());
            ImportParseError::ParseFailed(format!("Failed to parse row {line}: {e}"))
        })?;
        let row_num = record_line(data, &record);

        // 跳过空行
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        rows.push(ImportRow {
            row_num,
            admission_number: record.get(admission_idx).unwrap_or("").to_string(),
            score: record.get(score_idx).unwrap_or("").to_string(),
            remarks: remarks_idx
                .and_then(|i| record.get(i))
                .map(str::to_string)
                .filter(|s| !s.is_empty()),
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_with_remarks() {
        let data = b"admission_number,score,remarks\nADM001, 78 ,Good\nADM002,45,\n";
        let rows = parse_csv(data).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            ImportRow {
                row_num: 2,
                admission_number: "ADM001".to_string(),
                score: "78".to_string(),
                remarks: Some("Good".to_string()),
            }
        );
        assert_eq!(rows[1].row_num, 3);
        assert_eq!(rows[1].remarks, None);
    }

    #[test]
    fn test_parse_csv_headers_are_case_insensitive_and_reorderable() {
        let data = b"Score,Admission_Number\n12.5,ADM9\n";
        let rows = parse_csv(data).unwrap();
        assert_eq!(rows[0].admission_number, "ADM9");
        assert_eq!(rows[0].score, "12.5");
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let err = parse_csv(b"admission_number,marks\nADM1,40\n").unwrap_err();
        assert_eq!(err, ImportParseError::MissingColumn("score".to_string()));
        assert_eq!(err.error_code(), ErrorCode::ImportFileMissingColumn);
    }

    #[test]
    fn test_parse_csv_skips_blank_lines_and_bom() {
        let data = "\u{feff}admission_number,score\nADM1,40\n,\nADM2,41\n";
        let rows = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].admission_number, "ADM2");
        assert_eq!(rows[1].row_num, 4);
    }

    #[test]
    fn test_parse_csv_row_numbers_after_empty_lines() {
        let rows = parse_csv(b"admission_number,score\nADM1,40\n\nADM2,abc\n\n\nADM3,50\n").unwrap();
        let lines: Vec<(usize, &str)> = rows
            .iter()
            .map(|r| (r.row_num, r.admission_number.as_str()))
            .collect();
        assert_eq!(lines, vec![(2, "ADM1"), (4, "ADM2"), (7, "ADM3")]);
    }

    #[test]
    fn test_parse_csv_row_numbers_with_crlf() {
        let rows = parse_csv(b"admission_number,score\r\nADM1,40\r\n\r\nADM2,41\r\n").unwrap();
        assert_eq!(rows[0].row_num, 2);
        assert_eq!(rows[1].row_num, 4);
    }
}
