pub(crate) const DEFAULT_WHOLE_BODY_SIZE_LIMIT: u64 = u64::MAX;
pub(crate) const DEFAULT_PER_FIELD_SIZE_LIMIT: u64 = u64::MAX;
pub(crate) const DEFAULT_CHARSET: &str = "utf-8";

pub(crate) const BOUNDARY_EXT: &str = "--";
pub(crate) const CRLF: &str = "\r\n";
pub(crate) const CRLF_CRLF: &str = "\r\n\r\n";

pub(crate) const CONTENT_DISPOSITION_PREFIX: &str = "Content-Disposition:";
pub(crate) const CONTENT_TYPE_PREFIX: &str = "Content-Type:";
pub(crate) const NAME_PARAM: &str = "name=\"";
pub(crate) const FILE_NAME_PARAM: &str = "filename=\"";

pub(crate) const APPLICATION_WWW_FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub(crate) const MULTIPART_FORM_DATA: &str = "multipart/form-data";
pub(crate) const DEFAULT_FILE_CONTENT_TYPE: &str = "text/plain";

pub(crate) const QUERY_STRING: &str = "QUERY_STRING";
pub(crate) const CONTENT_TYPE: &str = "CONTENT_TYPE";
pub(crate) const CONTENT_LENGTH: &str = "CONTENT_LENGTH";
pub(crate) const HTTP_COOKIE: &str = "HTTP_COOKIE";
pub(crate) const HTTPS: &str = "HTTPS";
