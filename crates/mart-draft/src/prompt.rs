//! Prompt text sent to the model.
//!
//! The storefront sells in Taiwan, so prompts ask for Traditional Chinese
//! copy and prices in New Taiwan dollars.

pub fn name_prompt() -> String {
    "請根據這張圖片，為商品取一個簡短又吸引人的中文名稱。只輸出名稱本身，不要加引號或其他說明。"
        .to_string()
}

pub fn description_prompt(name: &str) -> String {
    format!(
        "圖片中的商品名稱是「{name}」。請用中文寫一段約 100 到 150 字的商品介紹，語氣生動，突顯商品特色。"
    )
}

pub fn price_prompt(name: &str, description: &str) -> String {
    format!(
        "商品名稱：{name}\n商品描述：{description}\n\n請依照以上資訊建議一個合理的新台幣售價，只輸出一個數字，不要任何文字。"
    )
}
