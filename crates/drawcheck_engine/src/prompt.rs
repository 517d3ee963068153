use std::borrow::Cow;

use serde::Serialize;

use crate::{AnalysisMode, ModelSelection};

pub const FAST_TEXT_LIMIT: usize = 1000;
pub const STANDARD_TEXT_LIMIT: usize = 1800;
pub const TRUNCATION_MARKER: &str = "...";

const STANDARD_LINKS: &str = "\
Для каждой проблемы добавь ссылку на ГОСТ: 
- ГОСТ 2.308-2011: https://meganorm.ru/Data2/1/4293800/4293800222.pdf (допуски формы)
- ГОСТ 2.307-2011: https://meganorm.ru/Data2/1/4293800/4293800223.pdf (размеры)
- ГОСТ 2.309-73: https://www.ntcexpert.ru/documents/GOST_2.309.pdf (шероховатость)
- ГОСТ 2.104-2006: https://meganorm.ru/Data2/1/4293850/4293850184.pdf (основные надписи)";

const FAST_HEAD: &str = "
ТЫ: Эксперт ГОСТ. Проанализируй чертеж быстро, включая текст и графику.

КРИТЕРИИ:
- Основная надпись (наименование, код, подписи)
- Соответствие кода документа (СБ, ВО, ГЧ, МЧ)
- Обязательные реквизиты (масса, масштаб)
- Положение деталей: проверка размеров на полках линий-выносок, угловые размеры в зоне 30°, дополнительные стрелки для допусков
- Шероховатость: наличие знака √ в скобках
- Позиции фигур: наличие буквенных обозначений баз (A, B и т.д.), их соответствие в рамках

ТЕКСТ: ";

const FAST_TAIL: &str = "

Если есть изображение: опиши графику, проверь положение элементов, сравни с текстом.

{links}

ФОРМАТ ОТВЕТА (ТОЧНО):

СООТВЕТСТВИЕ: [ДА/НЕТ]
ПРОБЛЕМЫ:
- [проблема 1] (Ссылка на ГОСТ: [ссылка])
- [проблема 2] 
РЕКОМЕНДАЦИИ:
- [рекомендация 1]

ТОЛЬКО РУССКИЙ ЯЗЫК. КРАТКО.
";

const STANDARD_HEAD: &str = "
ТЫ: Эксперт по технической документации и российским стандартам ГОСТ. Твоя задача - анализировать чертежи на соответствие ГОСТ, включая текст и графику (положение деталей, фигур, размеров).

АНАЛИЗИРУЙ этот чертеж и проверь соответствие ГОСТ по следующим критериям:

1. ОСНОВНАЯ НАДПИСЬ - наличие и правильность заполнения:
   - Наименование изделия
   - Обозначение документа (код: СБ, ВО, ГЧ, МЧ и т.д.)
   - Подписи (Разраб., Пров., Т.контр., Н.контр., Утв.)
   - Масса, масштаб, листы

2. КОД ДОКУМЕНТА - соответствие наименованию:
   - СБ = Сборочный чертеж
   - ВО = Чертеж общего вида  
   - ГЧ = Габаритный чертеж
   - МЧ = Монтажный чертеж

3. ТЕХНИЧЕСКИЕ ТРЕБОВАНИЯ:
   - Расположение над основной надписью
   - Ширина не более 185 мм

4. ОБОЗНАЧЕНИЯ И СИМВОЛЫ:
   - Буквенные обозначения в технических требованиях
   - Символы *, **, *** 
   - Знак √ в скобках для шероховатости

5. ГРАФИКА И ПОЛОЖЕНИЕ:
   - Простановка размеров на полке линии-выноски (в зоне 30°)
   - Угловые размеры в зоне 30°
   - Дополнительные стрелки для допусков формы (ГОСТ 2.308)
   - Соответствие буквенных обозначений баз в рамках
   - Положение фигур, деталей: сравни с текстом, выяви несоответствия (например, Ra на поверхностях)

ТЕКСТ ЧЕРТЕЖА ДЛЯ АНАЛИЗА:
";

const STANDARD_TAIL: &str = "

Если есть изображение: опиши видимые элементы, проверь позиции, сравни с требованиями ГОСТ.

{links}

ФОРМАТ ОТВЕТА (СТРОГО ПРИДЕРЖИВАЙСЯ ЭТОГО ФОРМАТА):

СООТВЕТСТВИЕ: [ДА/НЕТ]
ОБЩИЙ ВЫВОД: [1-2 предложения]

ДЕТАЛЬНЫЙ АНАЛИЗ:
1. Основная надпись: [СООТВЕТСТВУЕТ/НЕ СООТВЕТСТВУЕТ] - [причина] (Ссылка на ГОСТ: [ссылка])
2. Код документа: [СООТВЕТСТВУЕТ/НЕ СООТВЕТСТВУЕТ] - [причина]  
3. Подписи: [СООТВЕТСТВУЕТ/НЕ СООТВЕТСТВУЕТ] - [причина]
4. Технические требования: [СООТВЕТСТВУЕТ/НЕ СООТВЕТСТВУЕТ] - [причина]
5. Обозначения: [СООТВЕТСТВУЕТ/НЕ СООТВЕТСТВУЕТ] - [причина]
6. Графика и положение: [СООТВЕТСТВУЕТ/НЕ СООТВЕТСТВУЕТ] - [причина, включая описание позиций] (Ссылка на ГОСТ: [ссылка])

РЕКОМЕНДАЦИИ:
- [конкретная рекомендация 1]
- [конкретная рекомендация 2]

НЕ ИЗМЕНЯЙ ФОРМАТ ОТВЕТА. ОТВЕЧАЙ ТОЛЬКО НА РУССКОМ ЯЗЫКЕ.
";

/// Sampling options sent with each generate call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceOptions {
    pub temperature: f32,
    pub num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    pub repeat_penalty: f32,
}

impl InferenceOptions {
    pub fn for_mode(mode: AnalysisMode) -> Self {
        match mode {
            AnalysisMode::Fast => Self {
                temperature: 0.05,
                num_predict: 300,
                top_k: Some(20),
                top_p: None,
                repeat_penalty: 1.1,
            },
            AnalysisMode::Standard => Self {
                temperature: 0.1,
                num_predict: 600,
                top_k: None,
                top_p: Some(0.8),
                repeat_penalty: 1.2,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub model: String,
    pub prompt: String,
    /// Base64 PNG pages; `None` for text-only requests.
    pub images: Option<Vec<String>>,
    pub options: InferenceOptions,
}

pub fn text_limit(mode: AnalysisMode) -> usize {
    match mode {
        AnalysisMode::Fast => FAST_TEXT_LIMIT,
        AnalysisMode::Standard => STANDARD_TEXT_LIMIT,
    }
}

/// Keeps the first `limit` characters and appends the marker when anything was cut.
pub fn truncate_for_prompt(text: &str, limit: usize) -> Cow<'_, str> {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => Cow::Owned(format!("{}{}", &text[..byte_index], TRUNCATION_MARKER)),
        None => Cow::Borrowed(text),
    }
}

pub fn build_prompt(mode: AnalysisMode, text: &str) -> String {
    let excerpt = truncate_for_prompt(text, text_limit(mode));
    let (head, tail) = match mode {
        AnalysisMode::Fast => (FAST_HEAD, FAST_TAIL),
        AnalysisMode::Standard => (STANDARD_HEAD, STANDARD_TAIL),
    };
    format!("{head}{excerpt}{}", tail.replace("{links}", STANDARD_LINKS))
}

/// The vision model is chosen only when there is at least one page image.
pub fn build_request(
    mode: AnalysisMode,
    text: &str,
    images: Option<Vec<String>>,
    models: &ModelSelection,
) -> AnalysisRequest {
    let images = images.filter(|images| !images.is_empty());
    let model = if images.is_some() {
        models.vision_model.clone()
    } else {
        models.text_model.clone()
    };
    AnalysisRequest {
        model,
        prompt: build_prompt(mode, text),
        images,
        options: InferenceOptions::for_mode(mode),
    }
}
