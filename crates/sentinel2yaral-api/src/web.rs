//! Embedded converter form page
//!
//! 変換フォームページ。UIフレームワークは使わず、素のHTMLフォームと
//! fetchのみで `/api` を呼び出す。

use axum::response::Html;

/// Serve the converter form page
pub async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Sentinel to YARA-L Rule Converter</title>
<style>
  body { font-family: sans-serif; margin: 0; display: flex; }
  #sidebar { width: 280px; background: #f4f4f4; padding: 1rem; min-height: 100vh; }
  #main { flex: 1; padding: 1rem 2rem; }
  .columns { display: flex; gap: 2rem; }
  .col { flex: 1; min-width: 0; }
  textarea { width: 100%; height: 18rem; font-family: monospace; }
  pre { background: #f8f8f8; border: 1px solid #ddd; padding: 0.75rem; overflow: auto; min-height: 18rem; }
  label { display: block; margin-top: 0.75rem; }
  .error { color: #b00020; }
  button { margin-top: 1rem; padding: 0.5rem 1rem; }
</style>
</head>
<body>
<div id="sidebar">
  <h2>About</h2>
  <p>Convert Microsoft Sentinel detection rules (YAML) into Chronicle
  YARA-L rules using Gemini.</p>
  <h3>How to Use</h3>
  <ol>
    <li>Pick an example rule or paste/upload your own YAML</li>
    <li>Adjust the model settings below</li>
    <li>Click <em>Convert to YARA-L</em> and download the result</li>
  </ol>
  <h3>LLM Configuration</h3>
  <label>Model
    <select id="model"></select>
  </label>
  <label>Temperature <span id="temperature-value"></span>
    <input type="range" id="temperature" min="0" max="1" step="0.1">
  </label>
  <label>Max tokens <span id="max-tokens-value"></span>
    <input type="range" id="max-tokens" min="1000" max="8192" step="1000">
  </label>
  <label>Top-p <span id="top-p-value"></span>
    <input type="range" id="top-p" min="0" max="1" step="0.05">
  </label>
</div>
<div id="main">
  <h1>Sentinel to YARA-L Rule Converter</h1>
  <div class="columns">
    <div class="col">
      <h2>Input</h2>
      <label><input type="radio" name="input-method" value="example" checked> Use Example</label>
      <label><input type="radio" name="input-method" value="upload"> Paste / Upload YAML</label>
      <div id="example-input">
        <label>Example rule
          <select id="example"></select>
        </label>
        <pre id="example-preview"></pre>
      </div>
      <div id="upload-input" hidden>
        <input type="file" id="file" accept=".yaml,.yml">
        <textarea id="rule-yaml" placeholder="Paste a Sentinel rule in YAML here"></textarea>
      </div>
      <button id="convert">Convert to YARA-L</button>
      <p id="status"></p>
    </div>
    <div class="col">
      <h2>Output</h2>
      <pre id="output"></pre>
      <button id="download" hidden>Download YARA-L Rule</button>
    </div>
  </div>
</div>
<script>
const $ = (id) => document.getElementById(id);

async function api(path, options) {
  const response = await fetch(path, options);
  const body = await response.json();
  if (!body.success) throw new Error(body.error || "Request failed");
  return body.data;
}

async function init() {
  const models = await api("/api/models");
  for (const model of models.models) {
    const option = new Option(model, model, model === models.default_model, model === models.default_model);
    $("model").add(option);
  }
  $("temperature").value = models.default_params.temperature;
  $("max-tokens").value = models.default_params.max_output_tokens;
  $("top-p").value = models.default_params.top_p;
  for (const id of ["temperature", "max-tokens", "top-p"]) {
    const show = () => $(id + "-value").textContent = $(id).value;
    $(id).addEventListener("input", show);
    show();
  }

  const examples = await api("/api/examples");
  for (const example of examples.examples) {
    $("example").add(new Option(example.display_name || example.name, example.name));
  }
  if (examples.count > 0) await previewExample();
}

async function previewExample() {
  const name = $("example").value;
  if (!name) return;
  const detail = await api("/api/examples/" + encodeURIComponent(name));
  $("example-preview").textContent = detail.yaml;
}

function inputMethod() {
  return document.querySelector("input[name=input-method]:checked").value;
}

async function convert() {
  $("status").textContent = "Converting rule...";
  $("status").className = "";
  $("download").hidden = true;

  const request = {
    model: $("model").value,
    temperature: parseFloat($("temperature").value),
    max_output_tokens: parseInt($("max-tokens").value, 10),
    top_p: parseFloat($("top-p").value),
  };
  if (inputMethod() === "example") {
    request.example = $("example").value;
  } else {
    request.rule_yaml = $("rule-yaml").value;
  }

  try {
    const result = await api("/api/convert", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify(request),
    });
    $("output").textContent = result.yaral_rule;
    $("status").textContent = "";
    $("download").hidden = false;
  } catch (e) {
    $("status").textContent = e.message;
    $("status").className = "error";
  }
}

function download() {
  const blob = new Blob([$("output").textContent], { type: "text/plain" });
  const link = document.createElement("a");
  link.href = URL.createObjectURL(blob);
  link.download = "converted_rule.yaral";
  link.click();
  URL.revokeObjectURL(link.href);
}

document.querySelectorAll("input[name=input-method]").forEach((radio) =>
  radio.addEventListener("change", () => {
    $("example-input").hidden = inputMethod() !== "example";
    $("upload-input").hidden = inputMethod() !== "upload";
  })
);
$("example").addEventListener("change", previewExample);
$("file").addEventListener("change", async () => {
  const file = $("file").files[0];
  if (file) $("rule-yaml").value = await file.text();
});
$("convert").addEventListener("click", convert);
$("download").addEventListener("click", download);

init().catch((e) => {
  $("status").textContent = e.message;
  $("status").className = "error";
});
</script>
</body>
</html>
"#;
