use vaultdoc::asset::{AssetError, Result};

/// Parse decimal or `0x`-prefixed hex offset literal.
pub(crate) fn parse_offset(value: &str) -> Result<usize> {
	let parsed = if let Some(stripped) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
		usize::from_str_radix(stripped, 16)
	} else {
		value.parse::<usize>()
	};

	parsed.map_err(|_| AssetError::InvalidNumberLiteral { value: value.to_owned() })
}

/// Render bytes as space-separated lowercase hex.
pub(crate) fn hex_preview(bytes: &[u8], max_len: usize) -> String {
	let mut out: Vec<String> = bytes.iter().take(max_len).map(|byte| format!("{byte:02x}")).collect();
	if bytes.len() > max_len {
		out.push("..".to_owned());
	}
	out.join(" ")
}
