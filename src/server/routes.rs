use crate::data::DataRegistry;
use crate::server::api;
use crate::server::state::SharedState;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }
}

pub fn route_request(state: &SharedState, method: &str, path: &str, body: &str) -> HttpResponse {
    let path = path.split('?').next().unwrap_or(path);
    match (method, path) {
        ("GET", "/") => HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "text/html; charset=utf-8",
            body: index_html(),
        },
        ("GET", "/api/health") => json_payload(api::health_payload()),
        ("GET", "/api/dice") => json_payload(api::dice_payload()),
        ("GET", "/api/dungeons") => {
            with_registry(state, |registry| json_payload(api::dungeons_payload(registry)))
        }
        ("GET", "/api/ultras") => {
            with_registry(state, |registry| json_payload(api::ultras_payload(registry)))
        }
        ("GET", "/api/data/version") => {
            with_registry(state, |registry| json_payload(api::data_version_payload(registry)))
        }
        ("GET", path) if ultra_locations_key(path).is_some() => {
            let raw_key = ultra_locations_key(path).unwrap_or_default();
            let Ok(key) = urlencoding::decode(raw_key) else {
                return error_response(400, "Bad Request", "Ultra key is not valid UTF-8");
            };
            with_registry(state, |registry| {
                api_payload(api::ultra_locations_payload(registry, &key))
            })
        }
        ("POST", "/api/estimate") => {
            with_registry(state, |registry| api_payload(api::estimate_payload(registry, body)))
        }
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

/// `/api/ultras/<key>/dungeons` -> `<key>` (still percent-encoded).
fn ultra_locations_key(path: &str) -> Option<&str> {
    path.strip_prefix("/api/ultras/")?
        .strip_suffix("/dungeons")
        .filter(|key| !key.is_empty() && !key.contains('/'))
}

fn with_registry(
    state: &SharedState,
    handler: impl FnOnce(&DataRegistry) -> HttpResponse,
) -> HttpResponse {
    match state.registry() {
        Ok(registry) => handler(&registry),
        Err(unavailable) => error_response(503, "Service Unavailable", &unavailable.message()),
    }
}

fn json_payload(payload: Result<String, serde_json::Error>) -> HttpResponse {
    match payload {
        Ok(body) => HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body,
        },
        Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
    }
}

fn api_payload(payload: Result<String, api::ApiError>) -> HttpResponse {
    match payload {
        Ok(body) => json_payload(Ok(body)),
        Err(err) => {
            let (status_code, status_text) = err.status();
            error_response(status_code, status_text, &err.to_string())
        }
    }
}

/// Error response for requests refused before routing.
pub(crate) fn reject(status_code: u16, status_text: &'static str) -> HttpResponse {
    error_response(status_code, status_text, status_text)
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}

fn index_html() -> String {
    r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>Ultra Drop Rate Calculator</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 720px; margin: 24px auto; padding: 0 12px; }
    .card { border: 1px solid #ddd; border-radius: 8px; padding: 14px; margin: 14px 0; }
    label { display:block; margin: 8px 0 4px; font-weight: 600; }
    select, input { width: 100%; padding: 8px; box-sizing: border-box; }
    button { margin-top: 12px; padding: 8px 14px; }
    #locations { font-size: 0.9rem; color: #555; margin: 6px 0 0; }
    #result { font-size: 1.2rem; font-weight: 600; min-height: 1.5em; }
    #disclaimer { font-size: 0.85rem; color: #777; }
  </style>
</head>
<body>
  <h1>Ultra Drop Rate Calculator</h1>

  <div class="card">
    <label for="ultra">Ultra</label>
    <select id="ultra"><option value="">Loading…</option></select>
    <p id="locations"></p>
    <label for="dungeon">Dungeon</label>
    <select id="dungeon"><option value="">Loading…</option></select>
    <label for="luck">Luck (0-25)</label>
    <input id="luck" type="number" min="0" max="25" value="0" />
    <label for="dice">Dice bonus</label>
    <select id="dice"></select>
    <div><button id="calc-btn">Calculate</button></div>
  </div>

  <div class="card">
    <p id="result"></p>
    <p id="disclaimer"></p>
  </div>

  <script>
    const ultraEl = document.getElementById('ultra');
    const dungeonEl = document.getElementById('dungeon');
    const luckEl = document.getElementById('luck');
    const diceEl = document.getElementById('dice');
    const locationsEl = document.getElementById('locations');
    const resultEl = document.getElementById('result');
    const disclaimerEl = document.getElementById('disclaimer');

    function fill(select, items, placeholder) {
      select.innerHTML = '';
      const first = document.createElement('option');
      first.value = '';
      first.textContent = placeholder;
      select.appendChild(first);
      items.forEach(item => {
        const opt = document.createElement('option');
        opt.value = item.key;
        opt.textContent = item.key;
        select.appendChild(opt);
      });
    }

    async function getJson(path) {
      const response = await fetch(path);
      const data = await response.json();
      if (!response.ok) throw new Error(data.message || ('HTTP ' + response.status));
      return data;
    }

    let allDungeons = [];
    Promise.all([getJson('/api/dungeons'), getJson('/api/ultras'), getJson('/api/dice')])
      .then(([dungeons, ultras, dice]) => {
        allDungeons = dungeons.dungeons;
        fill(dungeonEl, allDungeons, 'Select a dungeon');
        fill(ultraEl, ultras.ultras, 'Select an ultra');
        luckEl.max = dice.max_luck;
        dice.dice_bonus_options.forEach(value => {
          const opt = document.createElement('option');
          opt.value = value;
          opt.textContent = value === 0 ? 'None' : ('x' + value);
          diceEl.appendChild(opt);
        });
      })
      .catch(err => {
        [ultraEl, dungeonEl].forEach(select => {
          select.innerHTML = '<option value="">Error loading data</option>';
        });
        resultEl.textContent = 'Could not load dungeon/ultra data: ' + err.message;
      });

    ultraEl.addEventListener('change', async () => {
      locationsEl.textContent = '';
      if (!ultraEl.value) { fill(dungeonEl, allDungeons, 'Select a dungeon'); return; }
      try {
        const data = await getJson('/api/ultras/' + encodeURIComponent(ultraEl.value) + '/dungeons');
        locationsEl.textContent = data.description;
        fill(dungeonEl, data.dungeons.length ? data.dungeons : allDungeons, 'Select a dungeon');
      } catch (err) {
        locationsEl.textContent = err.message;
      }
    });

    document.getElementById('calc-btn').addEventListener('click', async () => {
      const luck = Math.max(0, Math.min(25, parseInt(luckEl.value, 10) || 0));
      luckEl.value = luck;
      const response = await fetch('/api/estimate', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({
          dungeon: dungeonEl.value,
          ultra: ultraEl.value,
          luck: luck,
          dice_bonus: diceEl.value,
        }),
      });
      const data = await response.json();
      if (data.status !== 'ok') {
        resultEl.textContent = data.message;
        disclaimerEl.textContent = '';
        return;
      }
      const result = data.result;
      resultEl.textContent = result.kind === 'runs' ? result.display : result.message;
      disclaimerEl.textContent = data.disclaimer;
    });
  </script>
</body>
</html>
"#
    .to_string()
}
