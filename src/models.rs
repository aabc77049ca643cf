use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 角色 ID，接口里可能是整数也可能是字符串，其余类型原样保留
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacterId {
    Number(i64),
    Text(String),
    Other(Value),
}

impl Default for CharacterId {
    fn default() -> Self {
        CharacterId::Number(0)
    }
}

/// 角色记录（只读，拉取后不再修改）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: CharacterId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub family: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
}

impl Character {
    /// 状态为 "Alive" 时标题显示为绿色，其余为红色
    pub fn is_alive(&self) -> bool {
        self.status == "Alive"
    }
}

// 接口偶尔返回 null，按缺省值处理
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// 字段类型不对时不拒绝整条记录：数字、布尔转成字符串，null 为空串
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_api_record() {
        let json = r#"{
            "id": 0,
            "firstName": "Daenerys",
            "lastName": "Targaryen",
            "fullName": "Daenerys Targaryen",
            "title": "Mother of Dragons",
            "family": "House Targaryen",
            "image": "daenerys.jpg",
            "imageUrl": "https://thronesapi.com/assets/images/daenerys.jpg"
        }"#;

        let character: Character = serde_json::from_str(json).unwrap();
        assert_eq!(character.id, CharacterId::Number(0));
        assert_eq!(character.full_name, "Daenerys Targaryen");
        assert_eq!(character.family, "House Targaryen");
        assert_eq!(
            character.image_url,
            "https://thronesapi.com/assets/images/daenerys.jpg"
        );
        assert_eq!(character.status, "");
        assert!(!character.is_alive());
    }

    #[test]
    fn test_missing_and_null_fields_default() {
        let json = r#"{"id": "jon", "fullName": "Jon Snow", "family": null, "status": "Alive"}"#;

        let character: Character = serde_json::from_str(json).unwrap();
        assert_eq!(character.id, CharacterId::Text("jon".to_string()));
        assert_eq!(character.family, "");
        assert_eq!(character.title, "");
        assert!(character.is_alive());
    }

    #[test]
    fn test_wrong_typed_fields_are_stringified() {
        let json = r#"{"id": 1.5, "fullName": 42, "title": true, "family": 7, "status": ["x"]}"#;

        let character: Character = serde_json::from_str(json).unwrap();
        assert_eq!(character.id, CharacterId::Other(serde_json::json!(1.5)));
        assert_eq!(character.full_name, "42");
        assert_eq!(character.title, "true");
        assert_eq!(character.family, "7");
        assert_eq!(character.status, r#"["x"]"#);
    }

    #[test]
    fn test_one_odd_record_keeps_the_rest() {
        let json = r#"[
            {"id": 1, "fullName": "Jon Snow", "family": "House Stark"},
            {"id": 2, "fullName": "Cersei Lannister", "family": 7},
            {"id": {"k": 3}, "fullName": "Arya Stark", "family": "House Stark"}
        ]"#;

        let characters: Vec<Character> = serde_json::from_str(json).unwrap();
        assert_eq!(characters.len(), 3);
        assert_eq!(characters[0].family, "House Stark");
        assert_eq!(characters[1].full_name, "Cersei Lannister");
        assert_eq!(characters[1].family, "7");
        assert_eq!(characters[2].full_name, "Arya Stark");
    }
}
